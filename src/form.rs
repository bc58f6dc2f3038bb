//! Terminal form: collects a profile, triggers segmentation, renders the result

use crate::models::inference::InferenceEngine;
use crate::types::advisory::Severity;
use crate::types::profile::{CustomerProfile, FieldSpec, FEATURE_COUNT, FIELDS};
use crate::types::report::{SegmentReport, CATEGORY_GUIDE};
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::error;

/// Shown when the form was filled but the action was not triggered
pub const FILL_IN_PROMPT: &str = "Fill in the details and click Generate Category.";

/// Section headings, keyed by the index of their first field
const SECTIONS: [(usize, &str); 3] = [
    (0, "Financial Information"),
    (3, "Credit Details"),
    (6, "Lifestyle"),
];

/// Parse one field entry.
///
/// Empty input keeps the current value (`Ok(None)`). Values outside the
/// field range are clamped, as a bounded input widget would.
pub fn parse_field(spec: &FieldSpec, raw: &str) -> Result<Option<f64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", raw));
    }
    if spec.integer && value.fract() != 0.0 {
        return Err(format!("{} must be a whole number", spec.label));
    }

    Ok(Some(spec.clamp(value)))
}

/// Interactive form over any line-based input and output.
pub struct FormShell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> FormShell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run form rounds until the user stops or input ends.
    ///
    /// Returns the number of reports shown.
    pub fn run(&mut self, engine: &InferenceEngine) -> Result<usize> {
        writeln!(self.output, "Customer Financial Segmentation System")?;
        writeln!(
            self.output,
            "Enter customer information to generate the predicted financial behavior category."
        )?;

        let mut current = CustomerProfile::default();
        let mut shown = 0;

        loop {
            let profile = match self.collect_profile(&current)? {
                Some(profile) => profile,
                None => break,
            };
            current = profile;

            match self.confirm("Generate Category?", true)? {
                None => break,
                Some(false) => writeln!(self.output, "{}", FILL_IN_PROMPT)?,
                Some(true) => match engine.segment(&profile) {
                    Ok(report) => {
                        render_report(&mut self.output, &report)?;
                        shown += 1;
                    }
                    Err(e) => {
                        error!(error = %e, "Segmentation failed");
                        writeln!(self.output, "Prediction failed: {}", e)?;
                    }
                },
            }

            if self.confirm("Another customer?", false)? != Some(true) {
                break;
            }
        }

        Ok(shown)
    }

    /// Prompt for every field. `None` when input ends midway.
    pub fn collect_profile(&mut self, current: &CustomerProfile) -> Result<Option<CustomerProfile>> {
        writeln!(self.output)?;
        writeln!(self.output, "Customer Profile")?;

        let mut values = current.values();
        for i in 0..FEATURE_COUNT {
            if let Some((_, title)) = SECTIONS.iter().find(|(start, _)| *start == i) {
                writeln!(self.output, "## {}", title)?;
            }
            match self.prompt_field(&FIELDS[i], values[i])? {
                Some(value) => values[i] = value,
                None => return Ok(None),
            }
        }

        Ok(Some(CustomerProfile::from_values(values)))
    }

    fn prompt_field(&mut self, spec: &FieldSpec, current: f64) -> Result<Option<f64>> {
        loop {
            write!(
                self.output,
                "{} ({}) [{}]: ",
                spec.label,
                spec.range_hint(),
                current
            )?;
            self.output.flush()?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            match parse_field(spec, &line) {
                Ok(Some(value)) => return Ok(Some(value)),
                Ok(None) => return Ok(Some(current)),
                Err(message) => writeln!(self.output, "  {}", message)?,
            }
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<Option<bool>> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "{} [{}]: ", question, hint)?;
            self.output.flush()?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            match line.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "  Please answer y or n")?,
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Render advisories, the prediction box and the category guide.
pub fn render_report<W: Write>(out: &mut W, report: &SegmentReport) -> std::io::Result<()> {
    writeln!(out)?;
    for advisory in &report.advisories {
        let marker = match advisory.severity() {
            Severity::Warning => "⚠️ ",
            Severity::Info => "💡",
        };
        writeln!(out, "{} {}", marker, advisory.message())?;
    }

    let line = format!("🎯 Predicted Category: {}", report.label);
    let width = line.chars().count() + 2;
    writeln!(out, "┌{}┐", "─".repeat(width))?;
    writeln!(out, "│ {} │", line)?;
    writeln!(out, "└{}┘", "─".repeat(width))?;
    if let Some(text) = report.label.guide() {
        writeln!(out, "{}", text)?;
    }

    render_guide(out)
}

/// Render the static guide for the known segments.
pub fn render_guide<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "---")?;
    writeln!(out, "📘 Category Guide")?;
    for (name, text) in CATEGORY_GUIDE.iter() {
        writeln!(out)?;
        writeln!(out, "› {}", name)?;
        writeln!(out, "  {}", text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::encoder::LabelEncoder;
    use crate::models::linear::LinearModel;
    use crate::models::loader::Artifacts;
    use crate::models::scaler::StandardScaler;
    use crate::types::advisory::Advisory;
    use crate::types::report::CategoryLabel;
    use std::sync::Arc;

    #[test]
    fn test_parse_field() {
        let age = &FIELDS[7];
        assert_eq!(parse_field(age, "35\n"), Ok(Some(35.0)));
        assert_eq!(parse_field(age, "  "), Ok(None));
        assert_eq!(parse_field(age, "150"), Ok(Some(100.0)));
        assert_eq!(parse_field(age, "3"), Ok(Some(18.0)));
        assert!(parse_field(age, "35.5").is_err());
        assert!(parse_field(age, "abc").is_err());
        assert!(parse_field(age, "inf").is_err());

        let savings = &FIELDS[2];
        assert_eq!(parse_field(savings, "0.625"), Ok(Some(0.625)));
        assert_eq!(parse_field(savings, "-1"), Ok(Some(0.0)));
    }

    #[test]
    fn test_collect_profile() {
        let input = "50000\n20000\n0.6\n2\n30\n1\n3000\n35\n";
        let mut output = Vec::new();
        let mut shell = FormShell::new(input.as_bytes(), &mut output);

        let profile = shell
            .collect_profile(&CustomerProfile::default())
            .unwrap()
            .unwrap();

        assert_eq!(
            profile.values(),
            [50000.0, 20000.0, 0.6, 2.0, 30.0, 1.0, 3000.0, 35.0]
        );
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("## Credit Details"));
        assert!(text.contains("Age (18 - 100) [18]: "));
    }

    #[test]
    fn test_collect_profile_reprompts_and_keeps_defaults() {
        // blank keeps the default, bad entries re-prompt, 12 cards clamps to 10
        let input = "\n\nabc\n0.5\n12\n\n2.5\n1\n\n\n";
        let mut output = Vec::new();
        let mut shell = FormShell::new(input.as_bytes(), &mut output);

        let profile = shell
            .collect_profile(&CustomerProfile::default())
            .unwrap()
            .unwrap();

        assert_eq!(profile.savings_rate, 0.5);
        assert_eq!(profile.credit_cards, 10);
        // 2.5 was rejected for emi_count, then 1 accepted
        assert_eq!(profile.emi_count, 1);
        assert_eq!(profile.age, 18);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("'abc' is not a number"));
        assert!(text.contains("Ongoing EMIs must be a whole number"));
    }

    #[test]
    fn test_collect_profile_eof() {
        let mut output = Vec::new();
        let mut shell = FormShell::new("100\n".as_bytes(), &mut output);
        assert!(shell
            .collect_profile(&CustomerProfile::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_render_report() {
        let report = SegmentReport::new(CategoryLabel::new("Spender"))
            .with_advisories(vec![Advisory::ExpensesExceedIncome]);
        let mut output = Vec::new();
        render_report(&mut output, &report).unwrap();

        let text = String::from_utf8(output).unwrap();
        let warning = text.find("Expenses exceed income").unwrap();
        let prediction = text.find("Predicted Category: Spender").unwrap();
        assert!(warning < prediction);
        assert!(text.contains("Category Guide"));
        assert!(text.contains("› Saver"));
        assert!(text.contains("› Balanced"));
    }

    #[test]
    fn test_render_report_describes_predicted_segment() {
        let report = SegmentReport::new(CategoryLabel::new("Spender"));
        let mut output = Vec::new();
        render_report(&mut output, &report).unwrap();

        let text = String::from_utf8(output).unwrap();
        let description = text.find("High spending tendencies").unwrap();
        assert!(description < text.find("Category Guide").unwrap());
        assert!(description > text.find("Predicted Category: Spender").unwrap());
    }

    #[test]
    fn test_render_report_unknown_label_has_no_description() {
        let report = SegmentReport::new(CategoryLabel::new("Hoarder"));
        let mut output = Vec::new();
        render_report(&mut output, &report).unwrap();

        let text = String::from_utf8(output).unwrap();
        let between = &text[text.find("Hoarder").unwrap()..text.find("---").unwrap()];
        assert!(!between.contains("spending"));
    }

    /// Spender when income > 0 and expenses > income, Saver otherwise
    fn engine() -> InferenceEngine {
        let scaler = StandardScaler::new(vec![0.0; 8], vec![1.0; 8]).unwrap();
        let mut coef = vec![vec![0.0; 8]; 2];
        coef[1][0] = -1.0;
        coef[1][1] = 1.0;
        let model = LinearModel {
            coef,
            intercept: vec![0.0, 0.0],
        };
        let encoder = LabelEncoder::new(vec!["Saver".to_string(), "Spender".to_string()]).unwrap();
        InferenceEngine::new(Arc::new(
            Artifacts::new(scaler, Box::new(model), encoder).unwrap(),
        ))
    }

    const SPENDER_FIELDS: &str = "50000\n60000\n0.2\n2\n30\n1\n3000\n35\n";

    fn run(input: &str) -> (usize, String) {
        let mut output = Vec::new();
        let shown = FormShell::new(input.as_bytes(), &mut output)
            .run(&engine())
            .unwrap();
        (shown, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_run_declined_shows_fill_in_prompt() {
        let (shown, text) = run(&format!("{}n\nn\n", SPENDER_FIELDS));

        assert_eq!(shown, 0);
        assert!(text.contains(FILL_IN_PROMPT));
        assert!(!text.contains("Predicted Category"));
        assert!(!text.contains("Category Guide"));
    }

    #[test]
    fn test_run_generates_report() {
        // blank answers take the defaults: generate, then stop
        let (shown, text) = run(&format!("{}\n\n", SPENDER_FIELDS));

        assert_eq!(shown, 1);
        assert!(!text.contains(FILL_IN_PROMPT));
        let warning = text.find("Expenses exceed income").unwrap();
        let prediction = text.find("Predicted Category: Spender").unwrap();
        let guide = text.find("Category Guide").unwrap();
        assert!(warning < prediction && prediction < guide);
        assert!(text.contains("┌"));
        assert!(text.contains("Another customer? [y/N]: "));
    }

    #[test]
    fn test_run_repeats_until_declined() {
        // second round keeps the previous values, so all blanks
        let input = format!("{}y\ny\n\n\n\n\n\n\n\n\ny\nn\n", SPENDER_FIELDS);
        let (shown, text) = run(&input);

        assert_eq!(shown, 2);
        assert_eq!(text.matches("Predicted Category: Spender").count(), 2);
        assert_eq!(text.matches("Customer Profile").count(), 2);
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        // input ends at the trigger question
        let (shown, text) = run(SPENDER_FIELDS);
        assert_eq!(shown, 0);
        assert!(text.contains("Generate Category? [Y/n]: "));
        assert!(!text.contains("Another customer?"));

        // input ends after one report, before answering
        let (shown, _) = run(&format!("{}y\n", SPENDER_FIELDS));
        assert_eq!(shown, 1);

        // input ends in the middle of the second profile
        let (shown, text) = run(&format!("{}y\ny\n100\n", SPENDER_FIELDS));
        assert_eq!(shown, 1);
        assert_eq!(text.matches("Customer Profile").count(), 2);
    }
}
