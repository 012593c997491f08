//! Study plan generation
//!
//! Builds a day-by-day study schedule for a topic. The output is a pure
//! function of (day count, topic, start date): callers that need
//! reproducible output inject the start date through `create_plan_from`.

use chrono::{Duration, Local, NaiveDate};
use thiserror::Error;

/// Hours allocated per study day
const HOURS_PER_DAY: u32 = 4;

/// Number of days rendered in full detail
const DETAILED_DAYS: u32 = 3;

/// Errors for malformed plan requests
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("day count must be at least 1")]
    InvalidDayCount,
}

/// Study plan generation tool
pub struct StudyPlanner;

impl StudyPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Create a plan starting today.
    pub fn create_plan(&self, days: u32, topic: &str) -> Result<String, PlanError> {
        self.create_plan_from(days, topic, Local::now().date_naive())
    }

    /// Create a plan starting at an explicit date.
    ///
    /// The plan spans `days` days (end date inclusive), allocates 4 hours
    /// per day, and details only the first 3 days; the remainder is
    /// summarized in a trailing note.
    pub fn create_plan_from(
        &self,
        days: u32,
        topic: &str,
        start: NaiveDate,
    ) -> Result<String, PlanError> {
        if days == 0 {
            return Err(PlanError::InvalidDayCount);
        }

        let end = start + Duration::days(i64::from(days) - 1);
        let total_hours = days * HOURS_PER_DAY;
        let tasks = daily_tasks(topic);

        let mut plan = format!("Study plan for '{topic}' covering {days} days:\n");
        plan.push_str(&format!(
            "From {} to {}\n",
            start.format("%d.%m.%Y"),
            end.format("%d.%m.%Y")
        ));
        plan.push_str(&format!(
            "Total hours: {} (~{:.1} hours/day)\n\n",
            total_hours,
            f64::from(total_hours) / f64::from(days)
        ));

        plan.push_str("First 3 days:\n");
        for day in 0..days.min(DETAILED_DAYS) {
            let date = start + Duration::days(i64::from(day));
            plan.push_str(&format!(
                "\nDay {} ({}, {}):\n",
                day + 1,
                date.format("%d.%m.%Y"),
                date.format("%A")
            ));
            for task in tasks {
                plan.push_str(&format!(" - {task}\n"));
            }
        }

        if days > DETAILED_DAYS {
            plan.push_str(&format!(
                "\n... and {} more days with similar schedule.",
                days - DETAILED_DAYS
            ));
        }

        Ok(plan)
    }
}

impl Default for StudyPlanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Select the per-day task template by topic keyword.
fn daily_tasks(topic: &str) -> [&'static str; 3] {
    let topic_lower = topic.to_lowercase();
    if topic_lower.contains("python") {
        [
            "Morning session: Python theory (1.5 hours)",
            "Day practice: writing code (2 hours)",
            "Evening review: problem analysis (0.5 hours)",
        ]
    } else if topic_lower.contains("algorithm") {
        [
            "Study a new algorithm (1.5 hours)",
            "Implement it yourself (2 hours)",
            "Complexity analysis and optimization (0.5 hours)",
        ]
    } else if topic_lower.contains("machine learning") || topic_lower.contains("ml") {
        [
            "ML and neural network theory (1.5 hours)",
            "Practice with libraries (2 hours)",
            "Work through a competition problem (0.5 hours)",
        ]
    } else {
        [
            "Theoretical part (2 hours)",
            "Practical tasks (1.5 hours)",
            "Review and note-taking (0.5 hours)",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
    }

    #[test]
    fn test_ten_day_python_plan() {
        let planner = StudyPlanner::new();
        let plan = planner
            .create_plan_from(10, "python study", reference_date())
            .expect("plan");

        assert!(plan.contains("covering 10 days"));
        assert!(plan.contains("From 01.01.2024 to 10.01.2024"));
        assert!(plan.contains("Total hours: 40"));
        assert!(plan.contains("Python theory"));

        // Exactly 3 detailed day blocks plus the remainder note.
        assert_eq!(plan.matches("\nDay ").count(), 3);
        assert!(plan.contains("... and 7 more days with similar schedule."));
    }

    #[test]
    fn test_short_plan_has_no_remainder_note() {
        let planner = StudyPlanner::new();
        let plan = planner
            .create_plan_from(2, "history", reference_date())
            .expect("plan");

        assert!(plan.contains("From 01.01.2024 to 02.01.2024"));
        assert_eq!(plan.matches("\nDay ").count(), 2);
        assert!(!plan.contains("more days with similar schedule"));
    }

    #[test]
    fn test_single_day_plan_end_equals_start() {
        let planner = StudyPlanner::new();
        let plan = planner
            .create_plan_from(1, "notes", reference_date())
            .expect("plan");

        assert!(plan.contains("From 01.01.2024 to 01.01.2024"));
        assert!(plan.contains("Total hours: 4"));
    }

    #[test]
    fn test_zero_days_is_invalid() {
        let planner = StudyPlanner::new();
        let err = planner
            .create_plan_from(0, "python", reference_date())
            .expect_err("should fail");
        assert_eq!(err.to_string(), "day count must be at least 1");
    }

    #[test]
    fn test_template_selection_by_keyword() {
        let planner = StudyPlanner::new();
        let date = reference_date();

        let algo = planner
            .create_plan_from(3, "algorithm practice", date)
            .expect("plan");
        assert!(algo.contains("Study a new algorithm"));

        let ml = planner
            .create_plan_from(3, "machine learning bootcamp", date)
            .expect("plan");
        assert!(ml.contains("neural network theory"));

        let other = planner.create_plan_from(3, "chemistry", date).expect("plan");
        assert!(other.contains("Theoretical part"));
    }

    #[test]
    fn test_plan_is_reproducible() {
        let planner = StudyPlanner::new();
        let date = reference_date();
        assert_eq!(
            planner.create_plan_from(5, "python", date).expect("plan"),
            planner.create_plan_from(5, "python", date).expect("plan")
        );
    }

    #[test]
    fn test_weekday_names_follow_start_date() {
        let planner = StudyPlanner::new();
        // 2024-01-01 was a Monday.
        let plan = planner
            .create_plan_from(3, "notes", reference_date())
            .expect("plan");
        assert!(plan.contains("Day 1 (01.01.2024, Monday):"));
        assert!(plan.contains("Day 3 (03.01.2024, Wednesday):"));
    }
}
