//! End-to-end exercises of the hotword service: load, correct, retrieve,
//! reload, plus the coarse-filter recall regression.

use hotword_core::{CorrectorConfig, EngineConfig, Phoneme};
use hotword_engine::{CoarseIndex, HotwordService};
use hotword_phonetic::{substring_score, Phonemizer};

const HOTWORDS: &str = "\
# 中文热词
撒贝宁
康辉
周涛
乐清
东方财富
科大讯飞

# English hotwords
CapsWriter
Python
Microsoft
7zip
";

const HISTORY: &str = "\
# correction history
原锯子不对
原句子不对
---
cloud code is good
Claude Code is good
";

fn service() -> HotwordService {
    let service = HotwordService::new(EngineConfig::default());
    service.update_hotwords(HOTWORDS);
    service.update_history(HISTORY);
    service
}

#[test]
fn chinese_confusable_substitution() {
    let service = service();
    let result = service.correct("我非常喜欢撒贝你说的新闻", 10);
    assert_eq!(result.text, "我非常喜欢撒贝宁说的新闻");
    let (_, score) = result
        .matches
        .iter()
        .find(|(w, _)| w == "撒贝宁")
        .expect("撒贝宁 missing from matches");
    assert!(*score >= 0.7, "score {score}");
}

#[test]
fn english_lcs_substitution() {
    let service = service();
    let result = service.correct("use caps riter to type", 10);
    assert_eq!(result.text, "use CapsWriter to type");
    let (_, score) = result
        .matches
        .iter()
        .find(|(w, _)| w == "CapsWriter")
        .expect("CapsWriter missing from matches");
    assert!(*score >= 0.7, "score {score}");
}

#[test]
fn every_hotword_is_a_fixed_point() {
    let service = service();
    for line in HOTWORDS.lines() {
        let word = line.trim();
        if word.is_empty() || word.starts_with('#') {
            continue;
        }
        let result = service.correct(word, 5);
        assert_eq!(result.text, word, "{word} was rewritten");
        assert!(result.matches.is_empty());
    }
}

#[test]
fn correction_is_idempotent() {
    let service = service();
    for text in [
        "我非常喜欢撒贝你说的新闻",
        "use caps riter to type",
        "东方菜富股票上涨了",
        "今天天气真不错",
    ] {
        let once = service.correct(text, 5);
        let twice = service.correct(&once.text, 5);
        assert_eq!(once.text, twice.text, "input {text}");
    }
}

#[test]
fn history_retrieval_round_trip() {
    let service = service();
    let results = service.search_history("这个原锯子写错了", 5);
    assert!(!results.is_empty());
    assert_eq!(results[0].0, "原锯子不对");
    assert_eq!(results[0].1, "原句子不对");
    assert!(results[0].2 >= 0.5);

    // The history corpus is independent of the hotword corpus
    let results = service.search_history("我很喜欢 cloud", 5);
    assert!(results.iter().any(|(w, _, _)| w.starts_with("cloud")));
}

#[test]
fn reload_swaps_corpus_wholesale() {
    let service = service();
    assert!(service.correct("撒贝你好", 5).text.contains("撒贝宁"));

    // Replacing the corpus drops the old entries entirely
    service.update_hotwords("比亚迪\n");
    assert_eq!(service.hotword_count(), 1);
    let result = service.correct("我非常喜欢撒贝你说的新闻", 5);
    assert_eq!(result.text, "我非常喜欢撒贝你说的新闻");
}

/// Every hotword the window search could ever accept at the similar
/// threshold must survive the coarse filter (within the candidate cap).
/// Non-English entries only ever match where their exact leading phoneme
/// occurs, so the baseline applies the same entry rule.
#[test]
fn coarse_recall_matches_exhaustive_search() {
    let config = CorrectorConfig::default();
    let phonemizer = Phonemizer::new();

    let corpus: Vec<(String, Vec<Phoneme>)> = HOTWORDS
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|w| (w.to_string(), phonemizer.phonemize(w)))
        .collect();

    let index = CoarseIndex::build(
        corpus.iter().map(|(w, p)| (w.as_str(), p.as_slice())),
        config.coarse_threshold(),
        config.length_slack,
    );

    let queries = [
        "我非常喜欢撒贝你说的新闻",
        "康灰是央视著名主持人",
        "东方菜富股票上涨了",
        "科大迅飞的语音识别",
        "use caps riter to type",
        "download pythn code",
        "install micro soft office",
        "在月清这个地方",
    ];

    for query in queries {
        let input = phonemizer.phonemize(query);
        let indexed: Vec<&str> = index
            .search(&input, config.top_k_candidates)
            .into_iter()
            .map(|(w, _)| w)
            .collect();

        for (word, phonemes) in &corpus {
            if phonemes.len() > input.len() + config.length_slack {
                continue;
            }
            let head = &phonemes[0];
            let reachable = head.is_english()
                || input
                    .iter()
                    .any(|p| p.lang == head.lang && p.value == head.value);
            let exact = substring_score(&input, phonemes);
            if reachable && exact >= config.similar_threshold() {
                assert!(
                    indexed.contains(&word.as_str()),
                    "coarse filter dropped {word} (exact score {exact}) for {query}"
                );
            }
        }
    }

    // The indexed search is the exhaustive scan minus unreachable entries
    for query in queries {
        let input = phonemizer.phonemize(query);
        let exhaustive = index.exhaustive_search(&input, config.top_k_candidates);
        let indexed = index.search(&input, config.top_k_candidates);
        for (word, _) in indexed {
            assert!(exhaustive.iter().any(|(w, _)| *w == word));
        }
    }
}
