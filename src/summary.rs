//! Pass/fail accumulation and the final printed report.

pub struct RunSummary {
    pub passed: usize,
    pub total: usize,
}

impl RunSummary {
    #[must_use]
    pub const fn new() -> Self {
        RunSummary {
            passed: 0,
            total: 0,
        }
    }

    pub const fn record(&mut self, passed: bool) {
        self.total = self.total.saturating_add(1);
        if passed {
            self.passed = self.passed.saturating_add(1);
        }
    }

    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

pub fn print_summary(summary: &RunSummary, results_path: &str) {
    let rule = "=".repeat(50);
    println!("{}", rule);
    println!(
        "Load Test Summary: {}/{} scenarios passed",
        summary.passed, summary.total
    );
    println!("Results saved in: {}/", results_path);
    println!("{}", rule);
}

#[cfg(test)]
mod tests {
    use super::RunSummary;

    #[test]
    fn empty_summary_counts_as_all_passed() -> Result<(), String> {
        let summary = RunSummary::new();
        if !summary.all_passed() {
            return Err("Expected empty summary to pass".to_owned());
        }
        Ok(())
    }

    #[test]
    fn record_accumulates_counts() -> Result<(), String> {
        let mut summary = RunSummary::new();
        summary.record(true);
        summary.record(false);
        summary.record(true);
        if summary.total != 3 || summary.passed != 2 {
            return Err(format!("Unexpected counts {}/{}", summary.passed, summary.total));
        }
        if summary.all_passed() {
            return Err("Expected mixed summary to fail".to_owned());
        }
        Ok(())
    }

    #[test]
    fn all_passes_means_success() -> Result<(), String> {
        let mut summary = RunSummary::new();
        summary.record(true);
        summary.record(true);
        if !summary.all_passed() {
            return Err("Expected all-pass summary to succeed".to_owned());
        }
        Ok(())
    }
}
