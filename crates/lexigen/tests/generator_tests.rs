//! End-to-end tests for DFA generation.

use lexigen::{
    ErrorBuffer, GeneratorError, LexerGenerator, LexerState, TokenSpec, TokenType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sym {
    If,
    Ident,
    Digit,
    Low,
    Ab,
    X,
    Ws,
    LetA,
    LetA2,
}

fn range(character: char) -> (u32, u32) {
    (u32::from(character), u32::from(character) + 1)
}

/// Follow the transition containing `character`, if any.
fn step<'a>(
    generator: &'a LexerGenerator<Sym>,
    state: &'a LexerState<Sym>,
    character: char,
) -> Option<&'a LexerState<Sym>> {
    let code = u32::from(character);
    state
        .transitions()
        .iter()
        .find(|transition| transition.begin <= code && code < transition.end)
        .map(|transition| generator.state(transition.target))
}

/// Drive the token DFA over `input` from the start state.
fn walk<'a>(generator: &'a LexerGenerator<Sym>, input: &str) -> Option<&'a LexerState<Sym>> {
    let mut state = generator.start_state()?;
    for character in input.chars() {
        state = step(generator, state, character)?;
    }
    Some(state)
}

#[test]
fn single_literal_token() {
    let tokens = vec![TokenSpec::new(TokenType::Literal, 1, Sym::If, "if")];
    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &[], &mut errors);
    assert!(errors.is_empty());

    assert_eq!(generator.states().count(), 3);

    let start = generator.start_state().unwrap();
    assert_eq!(start.transitions().len(), 1);
    assert_eq!(
        (start.transitions()[0].begin, start.transitions()[0].end),
        range('i')
    );

    let after_i = walk(&generator, "i").unwrap();
    assert_eq!(after_i.symbol(), None);
    assert_eq!(
        (after_i.transitions()[0].begin, after_i.transitions()[0].end),
        range('f')
    );

    let after_if = walk(&generator, "if").unwrap();
    assert_eq!(after_if.symbol(), Some(&Sym::If));
    assert!(after_if.transitions().is_empty());

    assert!(walk(&generator, "x").is_none());
}

#[test]
fn same_type_same_line_is_a_conflict() {
    let tokens = vec![
        TokenSpec::new(TokenType::Literal, 1, Sym::LetA, "a"),
        TokenSpec::new(TokenType::Literal, 1, Sym::LetA2, "a"),
    ];
    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &[], &mut errors);

    let conflicts: Vec<&GeneratorError> = errors
        .errors
        .iter()
        .filter(|(_, error)| matches!(error, GeneratorError::SymbolConflict { .. }))
        .map(|(_, error)| error)
        .collect();
    assert_eq!(conflicts.len(), 1);

    // The state is still generated with a deterministic choice.
    let accept = walk(&generator, "a").unwrap();
    assert_eq!(accept.symbol(), Some(&Sym::LetA));
}

#[test]
fn same_type_earlier_line_wins() {
    let tokens = vec![
        TokenSpec::new(TokenType::Literal, 2, Sym::LetA2, "a"),
        TokenSpec::new(TokenType::Literal, 1, Sym::LetA, "a"),
    ];
    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &[], &mut errors);
    assert!(errors.is_empty());

    let accept = walk(&generator, "a").unwrap();
    assert_eq!(accept.symbol(), Some(&Sym::LetA));
}

#[test]
fn higher_type_beats_earlier_line() {
    let tokens = vec![
        TokenSpec::new(TokenType::Regex, 1, Sym::Ident, "[a-z]+"),
        TokenSpec::new(TokenType::Literal, 2, Sym::If, "if"),
    ];
    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &[], &mut errors);
    assert!(errors.is_empty());

    // "if" matches both tokens; the literal outranks the regex.
    assert_eq!(walk(&generator, "if").unwrap().symbol(), Some(&Sym::If));

    // Prefixes and extensions fall back to the identifier.
    assert_eq!(walk(&generator, "i").unwrap().symbol(), Some(&Sym::Ident));
    assert_eq!(walk(&generator, "ifx").unwrap().symbol(), Some(&Sym::Ident));
    assert_eq!(walk(&generator, "zz").unwrap().symbol(), Some(&Sym::Ident));
}

#[test]
fn character_class_partitioning() {
    let tokens = vec![
        TokenSpec::new(TokenType::Regex, 1, Sym::Digit, "[0-9]"),
        TokenSpec::new(TokenType::Regex, 2, Sym::Low, "[0-5]"),
    ];
    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &[], &mut errors);
    assert!(errors.is_empty());

    let start = generator.start_state().unwrap();
    let ranges: Vec<(u32, u32)> = start
        .transitions()
        .iter()
        .map(|transition| (transition.begin, transition.end))
        .collect();
    assert_eq!(ranges, vec![(0x30, 0x36), (0x36, 0x3a)]);

    // Both tokens accept digits below six; the earlier line wins the tie.
    assert_eq!(walk(&generator, "3").unwrap().symbol(), Some(&Sym::Digit));
    assert_eq!(walk(&generator, "7").unwrap().symbol(), Some(&Sym::Digit));
}

#[test]
fn closure_through_star() {
    let tokens = vec![TokenSpec::new(TokenType::Regex, 1, Sym::Ab, "a*b")];
    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &[], &mut errors);
    assert!(errors.is_empty());

    assert_eq!(generator.states().count(), 2);

    // The start state loops on 'a' and accepts nothing.
    let start = generator.start_state().unwrap();
    assert_eq!(start.symbol(), None);
    let loop_transition = start
        .transitions()
        .iter()
        .find(|transition| transition.begin == u32::from('a'))
        .unwrap();
    assert_eq!(Some(loop_transition.target), generator.start_state_id());

    assert_eq!(walk(&generator, "b").unwrap().symbol(), Some(&Sym::Ab));
    assert_eq!(walk(&generator, "aaab").unwrap().symbol(), Some(&Sym::Ab));
    assert!(walk(&generator, "ba").is_none());
}

#[test]
fn whitespace_states_extend_the_index_space() {
    let tokens = vec![TokenSpec::new(TokenType::Literal, 1, Sym::X, "x")];
    let whitespace = vec![TokenSpec::new(TokenType::Literal, 1, Sym::Ws, " ")];
    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &whitespace, &mut errors);
    assert!(errors.is_empty());

    let main_indices: Vec<u32> = generator
        .states()
        .map(|state| state.index().unwrap())
        .collect();
    let whitespace_indices: Vec<u32> = generator
        .whitespace_states()
        .map(|state| state.index().unwrap())
        .collect();

    assert_eq!(main_indices, vec![0, 1]);
    assert_eq!(whitespace_indices, vec![2, 3]);

    // Both automatons have their own start state.
    assert!(generator.start_state().is_some());
    assert!(generator.whitespace_start_state().is_some());
    assert_ne!(
        generator.start_state_id(),
        generator.whitespace_start_state_id()
    );
}

fn c_like_tokens() -> Vec<TokenSpec<Sym>> {
    vec![
        TokenSpec::new(TokenType::Regex, 1, Sym::Ident, "[a-zA-Z_][a-zA-Z0-9_]*"),
        TokenSpec::new(TokenType::Regex, 2, Sym::Digit, "[0-9]+"),
        TokenSpec::new(TokenType::Literal, 3, Sym::If, "if"),
        TokenSpec::new(TokenType::Regex, 4, Sym::Ab, "a(b|c)*d?"),
    ]
}

#[test]
fn generation_is_deterministic() {
    type Table = Vec<(Option<u32>, Option<Sym>, Vec<(u32, u32, Option<u32>)>)>;

    let table = |generator: &LexerGenerator<Sym>| -> Table {
        generator
            .states()
            .chain(generator.whitespace_states())
            .map(|state| {
                (
                    state.index(),
                    state.symbol().copied(),
                    state
                        .transitions()
                        .iter()
                        .map(|transition| {
                            (
                                transition.begin,
                                transition.end,
                                generator.state(transition.target).index(),
                            )
                        })
                        .collect(),
                )
            })
            .collect()
    };

    let whitespace = vec![TokenSpec::new(TokenType::Regex, 9, Sym::Ws, "[ \\t\\n]+")];
    let mut errors = ErrorBuffer::new();
    let first = LexerGenerator::new(&c_like_tokens(), &whitespace, &mut errors);
    let second = LexerGenerator::new(&c_like_tokens(), &whitespace, &mut errors);
    assert!(errors.is_empty());

    assert_eq!(table(&first), table(&second));
}

#[test]
fn transitions_are_disjoint_and_sorted() {
    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&c_like_tokens(), &[], &mut errors);
    assert!(errors.is_empty());

    for state in generator.states() {
        let transitions = state.transitions();
        for pair in transitions.windows(2) {
            assert!(pair[0].begin < pair[0].end);
            assert!(pair[0].end <= pair[1].begin);
        }
    }
}

#[test]
fn transition_ranges_cover_the_contributing_positions() {
    // The generator rebuilds the same tree internally; node ids are stable
    // across runs, so a standalone parse describes the generator's states.
    let tokens = c_like_tokens();
    let mut actions = lexigen::ActionRegistry::new();
    let parser = lexigen::RegexParser::new(&tokens, &mut actions, &mut ());

    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &[], &mut errors);
    assert!(errors.is_empty());

    let merge = |mut ranges: Vec<(u32, u32)>| -> Vec<(u32, u32)> {
        ranges.sort_unstable();
        let mut merged: Vec<(u32, u32)> = Vec::new();
        for (begin, end) in ranges {
            match merged.last_mut() {
                Some(last) if begin <= last.1 => last.1 = last.1.max(end),
                _ => merged.push((begin, end)),
            }
        }
        merged
    };

    for state in generator.states() {
        let contributed: Vec<(u32, u32)> = state
            .items()
            .iter()
            .flat_map(|item| item.positions().iter())
            .filter_map(|&position| parser.tree().node(position).char_range())
            .collect();
        let covered: Vec<(u32, u32)> = state
            .transitions()
            .iter()
            .map(|transition| (transition.begin, transition.end))
            .collect();
        assert_eq!(merge(contributed), merge(covered));
    }
}

#[test]
fn every_token_reaches_its_accepting_state() {
    let tokens = vec![
        TokenSpec::new(TokenType::Literal, 1, Sym::If, "if"),
        TokenSpec::new(TokenType::Regex, 2, Sym::Digit, "[0-9]+"),
        TokenSpec::new(TokenType::Regex, 3, Sym::Ident, "[a-z]+"),
        TokenSpec::new(TokenType::Regex, 4, Sym::Ws, "( |\\t)+"),
    ];
    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &[], &mut errors);
    assert!(errors.is_empty());

    let cases = [
        ("if", Sym::If),
        ("0", Sym::Digit),
        ("90210", Sym::Digit),
        ("ifx", Sym::Ident),
        ("zebra", Sym::Ident),
        (" ", Sym::Ws),
        (" \t ", Sym::Ws),
    ];
    for (input, expected) in cases {
        let state = walk(&generator, input).unwrap();
        assert_eq!(state.symbol(), Some(&expected), "input {input:?}");
    }
}

#[test]
fn escapes_and_dot_in_token_regexes() {
    let tokens = vec![
        TokenSpec::new(TokenType::Regex, 1, Sym::X, r"\x41\n"),
        TokenSpec::new(TokenType::Regex, 2, Sym::Ident, "x.z"),
    ];
    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &[], &mut errors);
    assert!(errors.is_empty());

    assert_eq!(walk(&generator, "A\n").unwrap().symbol(), Some(&Sym::X));
    assert_eq!(walk(&generator, "xyz").unwrap().symbol(), Some(&Sym::Ident));
    assert_eq!(walk(&generator, "x/z").unwrap().symbol(), Some(&Sym::Ident));
    // Dot does not match a newline.
    assert!(walk(&generator, "x\nz").is_none());
}

#[test]
fn action_registry_is_shared_between_both_token_lists() {
    let tokens = vec![
        TokenSpec::new(TokenType::Regex, 1, Sym::Ident, "[a-z]+").with_action("identifier"),
    ];
    let whitespace = vec![
        TokenSpec::new(TokenType::Regex, 2, Sym::Ws, " +").with_action("identifier"),
        TokenSpec::new(TokenType::Regex, 3, Sym::Ws, "\\t+").with_action("tab"),
    ];
    let mut errors = ErrorBuffer::new();
    let generator = LexerGenerator::new(&tokens, &whitespace, &mut errors);
    assert!(errors.is_empty());

    let actions: Vec<(usize, String)> = generator
        .actions()
        .iter()
        .map(|action| (action.index, action.identifier.to_string()))
        .collect();
    assert_eq!(
        actions,
        vec![(0, "identifier".to_string()), (1, "tab".to_string())]
    );
}
