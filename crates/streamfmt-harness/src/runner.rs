//! Test execution engine.

use streamfmt_core::stdio::FormatState;

use crate::diff;
use crate::fixtures::{FixtureCase, FixtureSet, Step, parse_field, parse_manip};
use crate::verify::VerificationResult;

/// Runs fixture sets and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Run all cases in a set, each against a fresh formatting state.
    #[must_use]
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| {
                let actual = match execute_case(case) {
                    Ok(out) => out,
                    Err(reason) => format!("unsupported:{reason}"),
                };
                let passed = actual == case.expected;
                VerificationResult {
                    case_name: format!("{}/{}", fixture_set.family, case.name),
                    section: case.section.clone(),
                    passed,
                    diff: (!passed).then(|| diff::render_diff(&case.expected, &actual)),
                    expected: case.expected.clone(),
                    actual,
                }
            })
            .collect()
    }
}

/// Apply every step of `case` and return the concatenated output.
pub fn execute_case(case: &FixtureCase) -> Result<String, String> {
    let mut state = FormatState::new();
    let mut out = String::new();
    for step in &case.steps {
        match step {
            Step::Manip(m) => {
                let manip = parse_manip(m).ok_or_else(|| format!("manipulator '{m}'"))?;
                state.apply(manip);
            }
            Step::Reset(f) => {
                let field = parse_field(f).ok_or_else(|| format!("field '{f}'"))?;
                state.reset(field);
            }
            Step::Int(v) => state.render(*v, &mut out),
            Step::Long(v) => state.render(*v, &mut out),
            Step::Uint(v) => state.render(*v, &mut out),
            Step::Float(v) => state.render(*v, &mut out),
            Step::Bool(v) => state.render(*v, &mut out),
            Step::Str(v) => state.render(v.as_str(), &mut out),
            Step::Char(v) => state.render(*v, &mut out),
        }
    }
    Ok(out)
}
