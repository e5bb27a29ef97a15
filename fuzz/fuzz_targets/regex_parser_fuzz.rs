#![no_main]
use libfuzzer_sys::fuzz_target;

use lexigen::{ActionRegistry, RegexParser, TokenSpec, TokenType};

fuzz_target!(|data: &str| {
    let spec = TokenSpec::new(TokenType::Regex, 1, 0u32, data);
    let mut actions = ActionRegistry::new();
    let parser = RegexParser::from_token(&spec, &mut actions, &mut ());

    // Either the lexeme parsed cleanly or errors were counted; a tree with
    // errors must never be handed to state construction.
    if parser.error_count() == 0 && !parser.is_empty() {
        assert!(parser.root().is_some());
    }
});
