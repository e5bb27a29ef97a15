//! Calculator Lexer Example
//!
//! Builds the DFA for a small calculator language and prints the emitted
//! state table, the kind of output a code generator would serialize.

use lexigen::{ErrorBuffer, LexerGenerator, TokenSpec, TokenType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CalcSym {
    Number,
    Ident,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Let,
    Whitespace,
}

fn main() {
    let tokens = vec![
        TokenSpec::new(TokenType::Regex, 1, CalcSym::Number, "[0-9]+(\\.[0-9]+)?"),
        TokenSpec::new(TokenType::Regex, 2, CalcSym::Ident, "[a-z][a-z0-9]*"),
        TokenSpec::new(TokenType::Literal, 3, CalcSym::Let, "let"),
        TokenSpec::new(TokenType::Literal, 4, CalcSym::Plus, "+"),
        TokenSpec::new(TokenType::Literal, 5, CalcSym::Minus, "-"),
        TokenSpec::new(TokenType::Literal, 6, CalcSym::Star, "*"),
        TokenSpec::new(TokenType::Literal, 7, CalcSym::Slash, "/"),
        TokenSpec::new(TokenType::Literal, 8, CalcSym::LParen, "("),
        TokenSpec::new(TokenType::Literal, 9, CalcSym::RParen, ")"),
    ];
    let whitespace = vec![TokenSpec::new(
        TokenType::Regex,
        10,
        CalcSym::Whitespace,
        "[ \\t\\r\\n]+",
    )];

    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &whitespace, &mut errors);

    for (line, error) in &errors.errors {
        eprintln!("line {line}: {error}");
    }
    if !errors.is_empty() {
        std::process::exit(1);
    }

    println!("token states:");
    print_states(&generator, generator.states());
    println!("whitespace states:");
    print_states(&generator, generator.whitespace_states());

    let start = generator.start_state().and_then(|state| state.index());
    let whitespace_start = generator
        .whitespace_start_state()
        .and_then(|state| state.index());
    println!("start: {start:?}, whitespace start: {whitespace_start:?}");
}

fn print_states<'a>(
    generator: &LexerGenerator<CalcSym>,
    states: impl Iterator<Item = &'a lexigen::LexerState<CalcSym>>,
) {
    for state in states {
        let index = state.index().unwrap_or(u32::MAX);
        match state.symbol() {
            Some(symbol) => println!("  state {index} accepts {symbol:?}"),
            None => println!("  state {index}"),
        }
        for transition in state.transitions() {
            let target = generator.state(transition.target).index().unwrap_or(u32::MAX);
            println!(
                "    [{:#06x}, {:#06x}) -> {}",
                transition.begin, transition.end, target
            );
        }
    }
}
