#![no_main]

use esparse::lexer::{Lexer, TokenKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process valid UTF-8
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    // Limit input size to avoid timeout
    if source.len() > 100_000 {
        return;
    }

    let mut lexer = Lexer::new(source);

    // Consume all tokens until the end or the first error - should never panic
    while let Ok(token) = lexer.next_token() {
        if matches!(token.kind, TokenKind::Eof) {
            break;
        }
        // Every token lies inside the source
        assert!(token.start <= token.end && token.end <= source.len());
    }
});
