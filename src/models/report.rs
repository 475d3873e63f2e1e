/// Outcome of one import run. Row-level problems end up in `warnings`
/// and are counted in `skipped`; they never abort the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub updated: usize,
    pub skipped: usize,
    pub empty: usize,
    pub warnings: Vec<String>,
}

impl ImportReport {
    pub fn processed(&self) -> usize {
        self.imported + self.updated
    }

    pub fn skip(&mut self, reason: impl Into<String>) {
        self.skipped += 1;
        self.warnings.push(reason.into());
    }
}
