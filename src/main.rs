//! Unify two terms from the command line
//!
//! ```text
//! mgu <term1> <term2> [robinson | robinson-poly | paterson-wegman]
//! ```

use std::{env, process};

use mgu::{
    term::TermPair,
    unification::{self, Algorithm},
};

fn main() {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let (term1, term2, key) = match args.as_slice() {
        [term1, term2] => (term1, term2, Algorithm::default().key()),
        [term1, term2, key] => (term1, term2, key.as_str()),
        _ => {
            eprintln!("Usage: mgu <term1> <term2> [algorithm]");
            eprintln!(
                "Algorithms: {}",
                Algorithm::ALL.map(|algorithm| algorithm.key()).join(", ")
            );
            process::exit(1);
        }
    };

    let pair = match TermPair::from_strings(term1, term2) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    let strategy = match unification::create(key) {
        Ok(strategy) => strategy,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let result = strategy.find_unifier(&pair);
    match result.unified_term(&pair) {
        Some(term) => {
            println!("Found unifier for the terms:");
            println!("- {}", pair.term1());
            println!("- {}", pair.term2());
            println!("Resulting unifier is:");
            println!("{}", result.unifier());
            println!("Resulting term is:");
            println!("{term}");
        }
        None => {
            println!("Terms {} and {} are not unifiable", pair.term1(), pair.term2());
        }
    }
}
