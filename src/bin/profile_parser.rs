//! Profiling binary for the parser
//!
//! Build with: cargo build --profile profiling --features dev-tools --bin profile_parser
//! Profile with perf: perf record --call-graph=dwarf ./target/profiling/profile_parser
//!                    perf report
//! Or with flamegraph: cargo flamegraph --features dev-tools --bin profile_parser

use esparse::{ParseOptions, Parser};

/// Large realistic JavaScript source for profiling
fn generate_source(size: usize) -> String {
    let patterns = [
        // Class definition
        r#"
class Counter extends Base {
    #count = 0;
    static instances = 0;

    constructor(name, initialValue = 0) {
        super();
        this.name = name;
        this.#count = initialValue;
        Counter.instances++;
    }

    get value() { return this.#count; }
    increment() { this.#count++; return this; }
    static { this.registry = new Map(); }
}
"#,
        // Functions
        r#"
function process(data) {
    const { items, meta: { version = 1 } = {} } = data;
    return items.map((item) => ({
        ...item,
        processed: true,
        version,
        timestamp: Date.now(),
    }));
}
const double = async (x) => {
    await delay(x);
    return x * 2;
};
function* range(start, end) { for (let i = start; i < end; i++) yield i; }
"#,
        // Control flow
        r#"
if (condition && otherCondition) {
    outer: for (let i = 0; i < items.length; i++) {
        const item = items[i];
        switch (item.type) {
            case "a": handleA(item); break;
            case "b": continue outer;
            default: handleDefault(item ?? fallback);
        }
    }
} else {
    try {
        riskyOperation?.();
    } catch ({ message }) {
        console.error(`failed: ${message}`);
    } finally {
        cleanup();
    }
}
"#,
        // Objects, arrays, regexes
        r#"
var config = {
    name: "MyApp",
    version: "1.0.0",
    settings: { debug: true, logLevel: "info", pattern: /^[a-z]+\d*$/giu },
    endpoints: [
        { path: "/api/users", method: "GET" },
        { path: "/api/posts", method: "POST" },
    ],
    get url() { return this.endpoints[0].path; },
};
const [first, , ...rest] = numbers.filter(n => n > 0x10 && n < 1_000).map(n => n ** 2);
"#,
    ];

    let mut source = String::with_capacity(size);
    let mut i = 0;
    while source.len() < size {
        if let Some(pattern) = patterns.get(i % patterns.len()) {
            source.push_str("{\n");
            source.push_str(pattern);
            source.push_str("}\n\n");
        }
        i += 1;
    }
    source
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Default to 1MB, can be overridden with command line arg
    let size: usize = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1_000_000);

    let iterations: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    eprintln!("Generating {}KB source...", size / 1024);
    let source = generate_source(size);
    eprintln!("Source size: {} bytes", source.len());

    eprintln!("Running {} iterations of parser...", iterations);

    let options = ParseOptions::default();
    let start = std::time::Instant::now();
    let mut total_statements = 0usize;

    for i in 0..iterations {
        match Parser::new(&source, &options).parse_program() {
            Ok(program) => {
                total_statements += program.body.len();
            }
            Err(e) => {
                if i == 0 {
                    eprintln!("Parse error: {}", e);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    let bytes_per_sec = (source.len() * iterations) as f64 / elapsed.as_secs_f64();

    eprintln!("Done in {:?}", elapsed);
    eprintln!("Total statements: {}", total_statements);
    eprintln!("Throughput: {:.2} MB/s", bytes_per_sec / 1_000_000.0);
}
