//! Terminal rendering of an [`AnalysisReport`].
use std::fmt::Write;

use serde::Serialize;

use crate::analyzer::AnalysisReport;
use crate::model::AnalysisResult;

/// Serializable view of a report, used for `--json` output.
#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<&'a AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_error: Option<String>,
}

impl AnalysisReport {
    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary {
            analysis: self.analysis.as_ref().ok(),
            analysis_error: self.analysis.as_ref().err().map(|e| e.to_string()),
            text: self.text.as_ref().ok().map(String::as_str),
            text_error: self.text.as_ref().err().map(|e| e.to_string()),
        }
    }
}

fn percent(confidence: f64) -> f64 {
    confidence * 100.0
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}\n{}", "-".repeat(title.chars().count()));
}

/// Render the caption, tags, objects, people and OCR sections as plain text.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    match &report.analysis {
        Ok(result) => render_analysis(&mut out, result),
        Err(err) => {
            heading(&mut out, "Image Description");
            let _ = writeln!(out, "Analysis failed: {err}");
        }
    }

    heading(&mut out, "Extracted Text (OCR)");
    match &report.text {
        Ok(text) if text.is_empty() => out.push_str("No text found.\n"),
        Ok(text) => {
            let _ = writeln!(out, "{text}");
        }
        Err(err) => {
            let _ = writeln!(out, "Text extraction failed: {err}");
        }
    }

    out
}

fn render_analysis(out: &mut String, result: &AnalysisResult) {
    heading(out, "Image Description");
    match &result.caption {
        Some(caption) => {
            let _ = writeln!(
                out,
                "Caption: {} (Confidence: {:.2})",
                caption.text, caption.confidence
            );
        }
        None => out.push_str("No caption detected.\n"),
    }

    heading(out, "Tags");
    if result.tags.is_empty() {
        out.push_str("No tags detected.\n");
    }
    for tag in &result.tags {
        let _ = writeln!(out, "• {} ({:.2}%)", tag.name, percent(tag.confidence));
    }

    heading(out, "Detected Objects");
    if result.objects.is_empty() {
        out.push_str("No objects detected.\n");
    }
    for object in &result.objects {
        let _ = match object.confidence {
            Some(confidence) => writeln!(out, "• {} ({:.2}%)", object.name, percent(confidence)),
            None => writeln!(out, "• {}", object.name),
        };
    }

    heading(out, "People in Image");
    if result.people.is_empty() {
        out.push_str("No people detected.\n");
    }
    for person in &result.people {
        let _ = writeln!(
            out,
            "• Bounding box: {}, Confidence: {:.2}%",
            person.bounding_box,
            percent(person.confidence)
        );
    }
}
