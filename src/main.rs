use std::{env, process::exit};

use renfa::render;

fn main() {
    let mut args = env::args().skip(1);
    let pattern = args.next().unwrap_or_else(|| String::from("(a|b)*abb"));
    match renfa::compile(&pattern) {
        Ok(nfa) => {
            println!("Pattern: {}\n", pattern);
            println!("{}", render::state_table(&nfa));
            println!("{}", render::transition_table(&nfa));
            println!("{}", render::as_graphviz_code(&nfa));
            for input in args {
                println!("accepts({:?}) = {}", input, nfa.accepts(&input));
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    }
}
