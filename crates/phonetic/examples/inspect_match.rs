//! Inspect how a pattern aligns inside an utterance

use hotword_phonetic::{best_match, Phonemizer};

fn inspect(input: &str, pattern: &str) {
    let phonemizer = Phonemizer::new();
    let input_seq = phonemizer.phonemize(input);
    let pattern_seq = phonemizer.phonemize(pattern);

    println!("--- '{input}' vs '{pattern}' ---");
    println!(
        "Input:   {:?}",
        input_seq.iter().map(|p| p.value.as_str()).collect::<Vec<_>>()
    );
    println!(
        "Pattern: {:?}",
        pattern_seq.iter().map(|p| p.value.as_str()).collect::<Vec<_>>()
    );

    match best_match(&input_seq, &pattern_seq) {
        Some(found) => {
            let segment: Vec<&str> = input_seq[found.start..found.end]
                .iter()
                .map(|p| p.value.as_str())
                .collect();
            println!("Score:   {:.4}", found.score);
            println!("Segment: {segment:?}\n");
        }
        None => println!("No alignment (empty input)\n"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    inspect("我很喜欢 cloud", "claude");
    inspect("vscode", "VS Code");
    inspect("use caps riter to type", "CapsWriter");
    inspect("我非常喜欢撒贝你说的新闻", "撒贝宁");
    inspect("七福路", "七浦路");
}
