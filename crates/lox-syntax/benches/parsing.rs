use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use lox_syntax::lexer::lex;
use lox_syntax::{Parser, parse};

fn generate_program(statements: usize) -> String {
    let base = "print (1 + 2) * 3 - -4 / 5;\n\"a\" == \"b\" ? true : nil, 6.5;\n!false != 7 <= 8;\n";
    base.repeat(statements / 3)
}

fn generate_broken_program(statements: usize) -> String {
    let base = "print 1 +;\n) 2;\nprint \"ok\";\n1 @ 2;\n";
    base.repeat(statements / 4)
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let source = generate_program(3000);
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("lex_any_mode", |b| {
        b.iter(|| {
            let tokens = lex(std::hint::black_box(&source));
            std::hint::black_box(tokens);
        });
    });

    group.bench_function("parse", |b| {
        b.iter(|| {
            let tree = parse(std::hint::black_box(&source));
            std::hint::black_box(tree);
        });
    });

    let parser = Parser::new();
    group.bench_function("parse_reused_parser", |b| {
        b.iter(|| {
            let tree = parser.parse(std::hint::black_box(&source));
            std::hint::black_box(tree)
        });
    });

    let broken = generate_broken_program(3000);
    group.bench_function("parse_with_recovery", |b| {
        b.iter(|| {
            let tree = parse(std::hint::black_box(&broken));
            std::hint::black_box(tree);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parsing);
criterion_main!(benches);
