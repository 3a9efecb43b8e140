use criterion::{black_box, criterion_group, criterion_main, Criterion};
use renfa::compile;

fn all_inputs(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut inputs = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &frontier {
            for &char_literal in alphabet {
                let mut input = prefix.clone();
                input.push(char_literal);
                next.push(input);
            }
        }
        inputs.extend(next.iter().cloned());
        frontier = next;
    }
    inputs
}

fn do_the_work(pattern: &str, inputs: &[String], expected: &[bool]) {
    let nfa = compile(pattern).unwrap();
    let actual: Vec<bool> = inputs.iter().map(|input| nfa.accepts(input)).collect();
    assert_eq!(expected, actual.as_slice());
}

fn criterion_benchmark_membership(c: &mut Criterion) {
    let pattern = "(a|b)*abb";
    let inputs = all_inputs(&['a', 'b'], 10);
    let oracle = regex::Regex::new(&format!("^(?:{})$", pattern)).unwrap();
    let expected: Vec<bool> = inputs.iter().map(|input| oracle.is_match(input)).collect();

    c.bench_function("compile and match against two thousand inputs", |b| {
        b.iter(|| {
            do_the_work(
                black_box(pattern),
                black_box(&inputs),
                black_box(&expected),
            )
        })
    });
}

criterion_group!(benches, criterion_benchmark_membership);
criterion_main!(benches);
