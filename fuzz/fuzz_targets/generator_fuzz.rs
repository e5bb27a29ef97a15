#![no_main]
use libfuzzer_sys::fuzz_target;

use lexigen::{ErrorBuffer, LexerGenerator, TokenSpec, TokenType};

fuzz_target!(|data: &str| {
    // Split the input into a handful of lexemes and generate a DFA from
    // them. Construction must terminate and uphold the table invariants no
    // matter what the lexemes look like.
    let tokens: Vec<TokenSpec<usize>> = data
        .split('\u{1f}')
        .take(8)
        .enumerate()
        .map(|(index, lexeme)| {
            TokenSpec::new(TokenType::Regex, index as u32 + 1, index, lexeme)
        })
        .collect();

    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &[], &mut errors);

    for state in generator.states() {
        assert!(state.index().is_some());
        for pair in state.transitions().windows(2) {
            assert!(pair[0].end <= pair[1].begin);
        }
    }
});
