//! Interactive terminal loop: describe how you feel, review detected
//! symptoms and ranked conditions, optionally add symptoms and re-rank.

use std::io::{self, BufRead, Write};

use crate::config::{self, defaults};
use crate::inference::RankedPrediction;
use crate::session::TriageSession;

const DIVIDER: &str = "----------------------------------------------";

/// Run the prompt loop until `exit` or end of input.
pub fn run_chat<R: BufRead, W: Write>(
    session: &TriageSession,
    mut input: R,
    mut out: W,
) -> io::Result<()> {
    writeln!(out, "{} v{}", config::APP_NAME, config::APP_VERSION)?;
    writeln!(out, "Describe how you feel in your own words. Type 'exit' to quit.")?;

    loop {
        write!(out, "\nHow are you feeling today? ")?;
        out.flush()?;

        let Some(text) = read_line(&mut input)? else {
            break;
        };
        if text.eq_ignore_ascii_case("exit") {
            break;
        }

        let detected = session.extract(&text);
        if detected.is_empty() {
            writeln!(out, "No symptoms detected. Try describing more about how you feel.")?;
            continue;
        }

        writeln!(out, "\nDetected symptoms:")?;
        for d in &detected {
            writeln!(out, "  - {:<30} (confidence: {}%)", d.name, d.confidence)?;
        }

        let ids: Vec<&str> = detected.iter().map(|d| d.symptom_id.as_str()).collect();
        let ranked = session.predict(&ids, defaults::TOP_N);
        writeln!(out, "\nTop {} possible conditions:", ranked.len())?;
        write_predictions(&mut out, &ranked, true)?;

        writeln!(out, "Add any other symptoms from the lists above, separated by commas,")?;
        write!(out, "or press Enter to skip: ")?;
        out.flush()?;

        let Some(extra) = read_line(&mut input)? else {
            break;
        };

        if let Some(refined) = session.refine(&ids, &extra, defaults::TOP_N_REFINED) {
            writeln!(out, "\nAdded: {}", refined.added.join(", "))?;
            writeln!(out, "Final {} most probable conditions:", refined.predictions.len())?;
            write_predictions(&mut out, &refined.predictions, false)?;
        }

        writeln!(out, "{DIVIDER}")?;
    }

    writeln!(out, "\nGoodbye. Take care.")?;
    Ok(())
}

/// Next trimmed line, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn write_predictions<W: Write>(
    out: &mut W,
    predictions: &[RankedPrediction],
    numbered: bool,
) -> io::Result<()> {
    for (idx, p) in predictions.iter().enumerate() {
        let label = if numbered {
            format!("{}. {}", idx + 1, p.condition)
        } else {
            p.condition.clone()
        };
        writeln!(out, "{label:<33} - {:.2}% confidence", p.confidence_percent)?;
        writeln!(out, "   Common symptoms: {}\n", p.common_symptoms.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::test_session;

    fn chat(input: &str) -> String {
        let session = test_session();
        let mut out = Vec::new();
        run_chat(&session, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn exit_ends_loop() {
        let out = chat("exit\n");
        assert!(out.contains("How are you feeling today?"));
        assert!(out.contains("Goodbye"));
        assert!(!out.contains("Detected symptoms"));
    }

    #[test]
    fn end_of_input_ends_loop() {
        let out = chat("");
        assert!(out.contains("Goodbye"));
    }

    #[test]
    fn no_symptoms_message() {
        let out = chat("The weather is lovely\nexit\n");
        assert!(out.contains("No symptoms detected"));
    }

    #[test]
    fn detection_and_ranking_printed() {
        let out = chat("I have a runny nose and sore throat, no fever.\n\nexit\n");
        assert!(out.contains("Runny Nose"));
        assert!(out.contains("Sore Throat"));
        assert!(out.contains("(confidence: 100%)"));
        assert!(out.contains("1. Common Cold"));
        assert!(out.contains("% confidence"));
        // Enter skips the refinement pass.
        assert!(!out.contains("Final"));
    }

    #[test]
    fn extras_trigger_final_ranking() {
        let out = chat("I have a fever\ncough, fatigue\nexit\n");
        assert!(out.contains("Added: cough, fatigue"));
        assert!(out.contains("Final 3 most probable conditions:"));
    }

    #[test]
    fn unknown_extras_skip_final_ranking() {
        let out = chat("I have a fever\nitchy elbows\nexit\n");
        assert!(!out.contains("Final"));
    }
}
