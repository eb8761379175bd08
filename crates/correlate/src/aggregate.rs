use crate::counts::{ContingencyCounts, CorrelationTable};
use crate::tokenizer::words_in_bio;
use dump_protocol::User;
use std::sync::atomic::{AtomicBool, Ordering};

/// A corpus record with a free-text bio.
pub trait Profile {
    fn bio(&self) -> Option<&str>;
}

impl Profile for User {
    fn bio(&self) -> Option<&str> {
        User::bio(self)
    }
}

/// Correlate every bio word with `covariate` in a single pass.
///
/// The corpus yields `Ok` records until it ends or fails; the first `Err`
/// aborts the pass, the partial counts are dropped and the error is
/// returned unchanged.
pub fn correlate<I, R, E, F>(corpus: I, mut covariate: F) -> Result<CorrelationTable, E>
where
    I: IntoIterator<Item = Result<R, E>>,
    R: Profile,
    F: FnMut(&R) -> bool,
{
    let mut counts = ContingencyCounts::new();
    for record in corpus {
        let record = record?;
        let hit = covariate(&record);
        counts.observe(&words_in_bio(&record), hit);
    }
    Ok(counts.finish())
}

/// Same result as [`correlate`] over the concatenation of `shards`, with
/// each shard consumed on its own thread.
///
/// A failing shard stops the others at their next record; the error of the
/// first failing shard (in shard order) is returned.
pub fn correlate_sharded<I, R, E, F>(shards: Vec<I>, covariate: F) -> Result<CorrelationTable, E>
where
    I: IntoIterator<Item = Result<R, E>> + Send,
    R: Profile,
    E: Send,
    F: Fn(&R) -> bool + Sync,
{
    let aborted = AtomicBool::new(false);
    let shard_count = shards.len();

    let results: Vec<Option<Result<ContingencyCounts, E>>> = std::thread::scope(|scope| {
        let handles: Vec<_> = shards
            .into_iter()
            .map(|shard| {
                let covariate = &covariate;
                let aborted = &aborted;
                scope.spawn(move || count_shard(shard, covariate, aborted))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let mut merged = ContingencyCounts::new();
    for result in results {
        match result {
            Some(Ok(counts)) => merged.merge(counts),
            Some(Err(err)) => return Err(err),
            // cancelled: some other shard holds the error
            None => {}
        }
    }
    log::debug!("Merged {shard_count} correlation shards");
    Ok(merged.finish())
}

/// `None` when the shard stopped because another shard failed.
fn count_shard<I, R, E, F>(
    shard: I,
    covariate: &F,
    aborted: &AtomicBool,
) -> Option<Result<ContingencyCounts, E>>
where
    I: IntoIterator<Item = Result<R, E>>,
    R: Profile,
    F: Fn(&R) -> bool,
{
    let mut counts = ContingencyCounts::new();
    for record in shard {
        if aborted.load(Ordering::Relaxed) {
            return None;
        }
        match record {
            Ok(record) => {
                let hit = covariate(&record);
                counts.observe(&words_in_bio(&record), hit);
            }
            Err(err) => {
                aborted.store(true, Ordering::Relaxed);
                return Some(Err(err));
            }
        }
    }
    Some(Ok(counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::is_degenerate;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::cell::Cell;

    const EPS: f64 = 1e-6;

    #[derive(Debug, Clone)]
    struct Record {
        bio: Option<String>,
        flag: bool,
    }

    impl Profile for Record {
        fn bio(&self) -> Option<&str> {
            self.bio.as_deref()
        }
    }

    fn rec(bio: &str, flag: bool) -> Record {
        Record {
            bio: Some(bio.to_string()),
            flag,
        }
    }

    fn ok_all(records: &[Record]) -> Vec<Result<Record, String>> {
        records.iter().cloned().map(Ok).collect()
    }

    fn corpus() -> Vec<Record> {
        vec![
            rec("dogs hiking coffee", true),
            rec("dogs coffee", true),
            rec("cats hiking", false),
            rec("cats coffee wine", false),
            rec("dogs wine", true),
            rec("cats", false),
        ]
    }

    #[test]
    fn test_perfect_positive_and_negative() {
        let table = correlate(ok_all(&corpus()), |r: &Record| r.flag).unwrap();
        assert!((table["dogs"] - 1.0).abs() < EPS);
        assert!((table["cats"] + 1.0).abs() < EPS);
    }

    #[test]
    fn test_unrelated_word_is_zero() {
        // "coffee" in 2 of 4 flagged and 2 of 4 unflagged records.
        let records = vec![
            rec("coffee a", true),
            rec("coffee b", true),
            rec("c", true),
            rec("d", true),
            rec("coffee e", false),
            rec("coffee f", false),
            rec("g", false),
            rec("h", false),
        ];
        let table = correlate(ok_all(&records), |r: &Record| r.flag).unwrap();
        assert!(table["coffee"].abs() < EPS);
    }

    #[test]
    fn test_repeated_word_counts_once() {
        let repeated = vec![rec("fun fun fun fun", true), rec("boring", false)];
        let single = vec![rec("fun", true), rec("boring", false)];
        let a = correlate(ok_all(&repeated), |r: &Record| r.flag).unwrap();
        let b = correlate(ok_all(&single), |r: &Record| r.flag).unwrap();
        assert!((a["fun"] - b["fun"]).abs() < EPS);
    }

    #[test]
    fn test_missing_bio_counts_as_record() {
        let records = vec![
            rec("music", true),
            Record {
                bio: None,
                flag: false,
            },
        ];
        let table = correlate(ok_all(&records), |r: &Record| r.flag).unwrap();
        assert_eq!(table.len(), 1);
        assert!((table["music"] - 1.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_covariate_yields_sentinel() {
        let table = correlate(ok_all(&corpus()), |_: &Record| true).unwrap();
        assert!(!table.is_empty());
        assert!(table.values().all(|v| is_degenerate(*v)));
    }

    #[test]
    fn test_empty_corpus_is_empty_table() {
        let table = correlate(Vec::<Result<Record, String>>::new(), |r: &Record| r.flag).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_stream_error_aborts_without_partial_table() {
        let consumed = Cell::new(0);
        let items = vec![
            Ok(rec("a", true)),
            Err("cursor died".to_string()),
            Ok(rec("b", false)),
        ];
        let result = correlate(
            items.into_iter().inspect(|_| consumed.set(consumed.get() + 1)),
            |r: &Record| r.flag,
        );
        assert_eq!(result, Err("cursor died".to_string()));
        assert_eq!(consumed.get(), 2, "must stop at the error");
    }

    #[test]
    fn test_sharded_error_is_returned() {
        let good = ok_all(&corpus());
        let bad = vec![Ok(rec("x", true)), Err("shard failed".to_string())];
        let result = correlate_sharded(vec![good, bad], |r: &Record| r.flag);
        assert_eq!(result, Err("shard failed".to_string()));
    }

    #[test]
    fn test_sharded_matches_sequential() {
        let records = corpus();
        let sequential = correlate(ok_all(&records), |r: &Record| r.flag).unwrap();
        let (left, right) = records.split_at(2);
        let sharded =
            correlate_sharded(vec![ok_all(left), ok_all(right)], |r: &Record| r.flag).unwrap();
        assert_same_table(&sequential, &sharded);
    }

    fn assert_same_table(a: &CorrelationTable, b: &CorrelationTable) {
        assert_eq!(a.len(), b.len());
        for (word, value) in a {
            let other = b[word];
            if is_degenerate(*value) {
                assert!(is_degenerate(other), "{word}: {other} should be NaN");
            } else {
                assert!((value - other).abs() < EPS, "{word}: {value} != {other}");
            }
        }
    }

    proptest! {
        #[test]
        fn prop_shard_merge_equals_sequential(
            rows in proptest::collection::vec(
                (proptest::collection::vec(0usize..6, 0..5), any::<bool>()),
                0..40,
            ),
            split in 0usize..40,
        ) {
            const VOCAB: [&str; 6] = ["red", "green", "blue", "cyan", "pink", "gold"];
            let records: Vec<Record> = rows
                .iter()
                .map(|(idx, flag)| {
                    let bio = idx.iter().map(|i| VOCAB[*i]).collect::<Vec<_>>().join(" ");
                    rec(&bio, *flag)
                })
                .collect();
            let split = split.min(records.len());
            let (left, right) = records.split_at(split);

            let sequential = correlate(ok_all(&records), |r: &Record| r.flag).unwrap();
            let sharded = correlate_sharded(vec![ok_all(left), ok_all(right)], |r: &Record| r.flag)
                .unwrap();
            assert_same_table(&sequential, &sharded);

            for value in sequential.values() {
                prop_assert!(is_degenerate(*value) || (-1.0..=1.0).contains(value));
            }
        }
    }
}
