#![no_main]

use esparse::{ParseOptions, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the goal, the rest is source
    let Some((&mode, rest)) = data.split_first() else {
        return;
    };
    let Ok(source) = std::str::from_utf8(rest) else {
        return;
    };

    // Limit input size to avoid timeout
    if source.len() > 100_000 {
        return;
    }

    let options = ParseOptions::default()
        .with_module(mode & 1 != 0)
        .with_strict(mode & 2 != 0)
        .with_loc(mode & 4 != 0)
        .with_web_compat(mode & 8 == 0);

    // Parse should return Ok or Err, never panic; the output must serialize
    if let Ok(program) = Parser::new(source, &options).parse_program() {
        let _ = program.to_estree();
    }
});
