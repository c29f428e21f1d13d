use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use windex::manifest::Manifest;
use windex::{IndexConfig, run, run_manifest};

const CORPUS: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "A journey of a thousand miles begins with a single step!",
    "To be, or not to be: that is the question. 2B or not 2B?",
    "All that glitters is not gold; the early bird catches the worm.",
    "Where there is a will, there is a way. Actions speak louder than words.",
    "Better late than never... Practice makes perfect. Knowledge is power.",
    "Time flies when you're having fun. The pen is mightier than the sword.",
    "1234 %%% --- ###",
];

fn write_corpus(dir: &Path) -> Vec<std::path::PathBuf> {
    CORPUS
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let path = dir.join(format!("doc{}.txt", i + 1));
            fs::write(&path, text).unwrap();
            path
        })
        .collect()
}

fn read_outputs(dir: &Path) -> BTreeMap<char, String> {
    ('a'..='z')
        .map(|letter| {
            let text = fs::read_to_string(dir.join(format!("{}.txt", letter))).unwrap();
            (letter, text)
        })
        .collect()
}

#[test]
fn test_manifest_scenario_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("f1.txt");
    let second = dir.path().join("f2.txt");
    fs::write(&first, "cat dog cat").unwrap();
    fs::write(&second, "dog bird").unwrap();
    let manifest = dir.path().join("manifest.txt");
    fs::write(&manifest, format!("2\n{}\n{}\n", first.display(), second.display())).unwrap();

    let out = dir.path().join("out");
    let summary = run(&IndexConfig::new(3, 2, &manifest).with_output_dir(&out)).unwrap();

    assert_eq!(summary.files_indexed, 2);
    let outputs = read_outputs(&out);
    assert_eq!(outputs[&'c'], "cat:[1]\n");
    assert_eq!(outputs[&'d'], "dog:[1 2]\n");
    assert_eq!(outputs[&'b'], "bird:[2]\n");
    assert_eq!(outputs.values().filter(|text| !text.is_empty()).count(), 3);
}

#[test]
fn test_output_identical_across_worker_counts() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_corpus(dir.path());

    let mut baseline: Option<BTreeMap<char, String>> = None;
    for (mappers, reducers) in [(1, 1), (2, 3), (4, 26), (8, 5), (3, 30)] {
        let out = dir.path().join(format!("out_{}_{}", mappers, reducers));
        let config = IndexConfig::new(mappers, reducers, "unused").with_output_dir(&out);
        run_manifest(&config, Manifest::from_paths(paths.clone())).unwrap();

        let outputs = read_outputs(&out);
        match &baseline {
            Some(expected) => assert_eq!(&outputs, expected, "M={} R={}", mappers, reducers),
            None => baseline = Some(outputs),
        }
    }
}

#[test]
fn test_lines_are_sorted_and_ids_ascending() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_corpus(dir.path());
    let out = dir.path().join("out");
    run_manifest(
        &IndexConfig::new(4, 4, "unused").with_output_dir(&out),
        Manifest::from_paths(paths),
    )
    .unwrap();

    for (letter, text) in read_outputs(&out) {
        let parsed: Vec<(String, Vec<usize>)> = text
            .lines()
            .map(|line| {
                let (word, ids) = line.split_once(":[").unwrap();
                let ids = ids.strip_suffix(']').unwrap();
                let ids = ids.split(' ').map(|id| id.parse().unwrap()).collect();
                (word.to_string(), ids)
            })
            .collect();

        for (word, ids) in &parsed {
            assert!(word.starts_with(letter));
            assert!(word.bytes().all(|b| b.is_ascii_lowercase()));
            assert!(ids.windows(2).all(|w| w[0] < w[1]), "{} ids not strictly ascending", word);
            assert!(ids.iter().all(|id| (1..=CORPUS.len()).contains(id)));
        }
        for pair in parsed.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.1.len() > b.1.len() || (a.1.len() == b.1.len() && a.0 < b.0),
                "{} before {} in {}.txt",
                a.0,
                b.0,
                letter
            );
        }
    }

    let t = fs::read_to_string(out.join("t.txt")).unwrap();
    assert_eq!(t.lines().next(), Some("the:[1 3 4 7]"));
    // "2B" normalizes to "b" and is indexed like any other word
    assert!(fs::read_to_string(out.join("b.txt")).unwrap().contains("b:[3]\n"));
}

#[test]
fn test_unreadable_file_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.txt");
    fs::write(&good, "cat dog cat").unwrap();
    let missing = dir.path().join("missing.txt");

    let out = dir.path().join("out");
    let summary = run_manifest(
        &IndexConfig::new(2, 2, "unused").with_output_dir(&out),
        Manifest::from_paths(vec![good, missing.clone()]),
    )
    .unwrap();

    assert_eq!(summary.files_indexed, 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].path, missing);
    assert!(!summary.is_clean());

    let outputs = read_outputs(&out);
    assert_eq!(outputs[&'c'], "cat:[1]\n");
    assert_eq!(outputs[&'d'], "dog:[1]\n");
    assert!(outputs.values().all(|text| !text.contains('2')));
}

#[test]
fn test_existing_outputs_are_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, "apple").unwrap();
    fs::write(dir.path().join("a.txt"), "stale:[9]\nold:[1]\n").unwrap();

    run_manifest(
        &IndexConfig::new(1, 1, "unused").with_output_dir(dir.path()),
        Manifest::from_paths(vec![input]),
    )
    .unwrap();

    assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "apple:[1]\n");
}
