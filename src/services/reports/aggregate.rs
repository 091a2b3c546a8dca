//! 成绩汇总
//!
//! 纯计算：给定已取出的班级、科目、活动权重与评分方案，计算学生每科的
//! SBA（平时）成绩、考试成绩、总分、等级、评语与班级排名。
//!
//! - SBA 各活动贡献为 `sum / (count * 100) * weight`，累加后封顶 50 分
//! - 考试贡献固定为 `raw / 100 * 50`，与考试活动自身的 weight 无关
//! - 总分为两者之和四舍五入，落在 0..=100
//! - 排名采用竞赛排名：并列共享较好名次，后续名次跳过

use crate::models::{
    classes::entities::Class,
    grading::entities::GradeSetting,
    reports::responses::{StudentReport, SubjectReportRow},
    students::entities::{AssignmentScore, StudentProfile},
    subjects::entities::{AssignmentActivity, Subject},
    terms::entities::{TermInfo, TermLabel},
};

pub const SBA_TOTAL_WEIGHT: f64 = 50.0;
pub const EXAM_TOTAL_WEIGHT: f64 = 50.0;
pub const DEFAULT_EXAM_ACTIVITY: &str = "End of Term Exam";
pub const NOT_AVAILABLE: &str = "N/A";

/// 单科计算结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectScore {
    pub sba: f64,
    pub exam: f64,
    pub total: u32,
}

/// 成绩行归属
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScoreKind<'a> {
    Exam,
    Sba(&'a AssignmentActivity),
    Unmatched,
}

#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    classes: Vec<Class>,
    subjects: Vec<Subject>,
    activities: Vec<AssignmentActivity>,
    grade_settings: Vec<GradeSetting>,
    terms: Vec<TermInfo>,
    exam_activity_name: String,
}

impl ScoreAggregator {
    pub fn new(
        subjects: Vec<Subject>,
        activities: Vec<AssignmentActivity>,
        grade_settings: Vec<GradeSetting>,
    ) -> Self {
        Self {
            classes: Vec::new(),
            subjects,
            activities,
            grade_settings,
            terms: Vec::new(),
            exam_activity_name: DEFAULT_EXAM_ACTIVITY.to_string(),
        }
    }

    pub fn with_classes(mut self, classes: Vec<Class>) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_terms(mut self, terms: Vec<TermInfo>) -> Self {
        self.terms = terms;
        self
    }

    pub fn with_exam_activity(mut self, name: impl Into<String>) -> Self {
        self.exam_activity_name = name.into();
        self
    }

    pub fn subjects_for_class<'a>(&'a self, class_id: &'a str) -> impl Iterator<Item = &'a Subject> {
        self.subjects.iter().filter(move |s| s.is_taught_in(class_id))
    }

    fn exam_activity(&self) -> Option<&AssignmentActivity> {
        self.activities
            .iter()
            .find(|a| a.name == self.exam_activity_name)
    }

    fn classify(&self, score: &AssignmentScore) -> ScoreKind<'_> {
        if let Some(activity_id) = score.activity_id.as_deref() {
            if self.exam_activity().is_some_and(|a| a.id == activity_id) {
                return ScoreKind::Exam;
            }
            if let Some(activity) = self
                .activities
                .iter()
                .find(|a| a.id == activity_id && a.name != self.exam_activity_name)
            {
                return ScoreKind::Sba(activity);
            }
        }

        if score.assignment_name == self.exam_activity_name {
            return ScoreKind::Exam;
        }

        // 名称前缀匹配时取最长的活动名，避免 "Class" 抢走 "Classwork 1"
        self.activities
            .iter()
            .filter(|a| a.name != self.exam_activity_name && !a.name.is_empty())
            .filter(|a| score.assignment_name.starts_with(&a.name))
            .max_by_key(|a| a.name.len())
            .map(ScoreKind::Sba)
            .unwrap_or(ScoreKind::Unmatched)
    }

    /// 计算学生某一科目的 SBA、考试与总分
    pub fn subject_score(&self, student: &StudentProfile, subject_id: &str) -> SubjectScore {
        let mut sba_buckets: Vec<(&AssignmentActivity, f64, usize)> = Vec::new();
        let mut exam_raw: Option<f64> = None;

        for score in student
            .assignment_scores
            .iter()
            .filter(|s| s.subject_id == subject_id)
        {
            let raw = clamp_raw(score.score);
            match self.classify(score) {
                // 同一科目多条考试成绩时以最后录入的为准
                ScoreKind::Exam => exam_raw = Some(raw),
                ScoreKind::Sba(activity) => {
                    match sba_buckets.iter_mut().find(|(a, _, _)| a.id == activity.id) {
                        Some((_, sum, count)) => {
                            *sum += raw;
                            *count += 1;
                        }
                        None => sba_buckets.push((activity, raw, 1)),
                    }
                }
                ScoreKind::Unmatched => {}
            }
        }

        let sba: f64 = sba_buckets
            .iter()
            .map(|(activity, sum, count)| {
                let weight = if activity.weight.is_finite() {
                    activity.weight.max(0.0)
                } else {
                    0.0
                };
                sum * weight / (*count as f64 * 100.0)
            })
            .sum();
        let sba = sba.clamp(0.0, SBA_TOTAL_WEIGHT);
        let exam = exam_raw.unwrap_or(0.0) * EXAM_TOTAL_WEIGHT / 100.0;
        let total = (sba + exam).round().clamp(0.0, 100.0) as u32;

        SubjectScore { sba, exam, total }
    }

    /// 第一个包含总分的等级设置，区间缺口返回 "N/A"
    pub fn grade_for(&self, total: u32) -> (String, String) {
        self.grade_settings
            .iter()
            .find(|g| g.contains(total as f64))
            .map(|g| (g.grade.clone(), g.remarks.clone()))
            .unwrap_or_else(|| (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()))
    }

    /// 1 + 总分严格高于本人的学生数；本人始终计入排名池
    pub fn rank_in(
        &self,
        roster: &[StudentProfile],
        student: &StudentProfile,
        subject_id: &str,
        total: u32,
    ) -> usize {
        let higher = roster
            .iter()
            .filter(|s| s.student_no != student.student_no)
            .map(|s| self.subject_score(s, subject_id).total)
            .filter(|t| *t > total)
            .count();
        higher + 1
    }

    /// 计算学生成绩报告单
    ///
    /// 学生不在名单中或未分班时返回 None。
    pub fn compute_report(
        &self,
        student_no: &str,
        term_label: &str,
        roster: &[StudentProfile],
    ) -> Option<StudentReport> {
        let student = roster.iter().find(|s| s.student_no == student_no)?;
        let class_id = student.class_id()?;

        let rows: Vec<SubjectReportRow> = self
            .subjects_for_class(class_id)
            .map(|subject| {
                let score = self.subject_score(student, &subject.id);
                let (grade, remark) = self.grade_for(score.total);
                SubjectReportRow {
                    subject_id: subject.id.clone(),
                    subject_name: subject.name.clone(),
                    sba_score: round_2(score.sba),
                    exam_score: round_2(score.exam),
                    total_score: score.total,
                    grade,
                    remark,
                    rank: self.rank_in(roster, student, &subject.id, score.total),
                }
            })
            .collect();

        let overall_total: u32 = rows.iter().map(|r| r.total_score).sum();
        let overall_average = if rows.is_empty() {
            0.0
        } else {
            round_2(overall_total as f64 / rows.len() as f64)
        };

        let label = TermLabel::parse(term_label);
        let next_term_begins = self
            .terms
            .iter()
            .find(|t| label.matches(t))
            .and_then(|t| t.next_term_begins);
        let class_name = self
            .classes
            .iter()
            .find(|c| c.id == class_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| class_id.to_string());

        Some(StudentReport {
            student: student.clone(),
            class_id: class_id.to_string(),
            class_name,
            term: label.name,
            year: label.year,
            next_term_begins,
            number_on_roll: roster.len(),
            rows,
            overall_total,
            overall_average,
        })
    }
}

fn clamp_raw(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
