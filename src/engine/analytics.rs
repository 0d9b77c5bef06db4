// src/engine/analytics.rs

use std::collections::BTreeMap;

use crate::{
    engine::validation::validate_record,
    models::{
        analytics::{RecordRejection, SubjectAnalytics, SubjectAnalyticsReport},
        result_record::{ResultRecord, StoredResult},
    },
    utils::rounding::{average, round2},
};

/// Chapters with fewer recorded questions stay out of weak/strong lists.
pub const MIN_CHAPTER_QUESTIONS: usize = 3;

/// How many chapters each of the weak/strong lists holds at most.
pub const CHAPTER_LIST_LEN: usize = 3;

#[derive(Debug, Default)]
struct SubjectTotals {
    tests: usize,
    score_sum: i64,
    best_score: Option<i64>,
    time_sum: i64,
    /// chapter -> (correct, total)
    chapters: BTreeMap<String, (usize, usize)>,
}

impl SubjectTotals {
    fn add(&mut self, subject: &str, record: &ResultRecord) {
        self.tests += 1;
        self.score_sum += record.score;
        self.best_score = Some(self.best_score.map_or(record.score, |b| b.max(record.score)));
        self.time_sum += record.time_taken_secs;

        for q in record
            .questions
            .iter()
            .filter(|q| q.subject == subject && !q.chapter.is_empty())
        {
            let chapter = self.chapters.entry(q.chapter.clone()).or_default();
            if q.is_correct {
                chapter.0 += 1;
            }
            chapter.1 += 1;
        }
    }

    fn finish(self, subject: String) -> SubjectAnalytics {
        let mut performance: Vec<(String, f64)> = self
            .chapters
            .into_iter()
            .filter(|(_, (_, total))| *total >= MIN_CHAPTER_QUESTIONS)
            .map(|(chapter, (correct, total))| (chapter, average(correct as f64 * 100.0, total)))
            .collect();

        // Chapter names come out of the BTreeMap sorted, and the sorts are stable,
        // so equal averages keep ascending name order in both lists.
        performance.sort_by(|a, b| a.1.total_cmp(&b.1));
        let weak_chapters = performance
            .iter()
            .take(CHAPTER_LIST_LEN)
            .map(|(c, _)| c.clone())
            .collect();

        performance.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let strong_chapters = performance
            .iter()
            .take(CHAPTER_LIST_LEN)
            .map(|(c, _)| c.clone())
            .collect();

        SubjectAnalytics {
            subject,
            total_tests: self.tests,
            average_score: average(self.score_sum as f64, self.tests),
            best_score: self.best_score.unwrap_or(0),
            weak_chapters,
            strong_chapters,
            total_time_taken: round2(self.time_sum as f64),
            average_time_taken: average(self.time_sum as f64, self.tests),
        }
    }
}

/// Per-subject statistics over one user's result history.
///
/// Records failing `validate_record` are left out and listed in the report's
/// rejections. A test covering several subjects counts toward each of them with
/// its overall score and time.
pub fn subject_analytics<'a, I>(results: I) -> SubjectAnalyticsReport
where
    I: IntoIterator<Item = &'a StoredResult>,
{
    let mut subjects: BTreeMap<String, SubjectTotals> = BTreeMap::new();
    let mut rejections = Vec::new();

    for stored in results {
        let record = &stored.record;
        if let Err(reason) = validate_record(record) {
            tracing::error!("Invalid test result found: {} ({:?})", stored.id, reason);
            rejections.push(RecordRejection {
                record_id: Some(stored.id),
                reason,
            });
            continue;
        }

        for subject in record.subject_analysis.keys() {
            subjects
                .entry(subject.clone())
                .or_default()
                .add(subject, record);
        }
    }

    if !rejections.is_empty() {
        tracing::warn!(
            "Found {} invalid test results while processing analytics",
            rejections.len()
        );
    }

    SubjectAnalyticsReport {
        subjects: subjects
            .into_iter()
            .map(|(subject, totals)| totals.finish(subject))
            .collect(),
        rejected_records: rejections.len(),
        rejections,
    }
}
