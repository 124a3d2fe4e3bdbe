use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

const SYNTHETIC_LINE_HEIGHT: f64 = 12.0;

#[derive(Debug, Error)]
#[error("source unreadable: {reason}")]
pub struct SourceUnreadable {
    pub reason: String,
}

impl SourceUnreadable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWord {
    pub text: String,
    pub top: f64,
    pub fontname: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReportPage {
    pub text: String,
    pub words: Vec<PageWord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLine<'a> {
    pub page: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct ReportPages {
    pages: Vec<ReportPage>,
}

impl ReportPages {
    pub fn from_pdf(pdf_path: &Path, bytes: &[u8]) -> Result<Self> {
        if !bytes.starts_with(b"%PDF-") {
            return Err(SourceUnreadable::new(format!(
                "{} is not a PDF byte stream",
                pdf_path.display()
            ))
            .into());
        }

        let texts = extract_pages_with_pdftotext(pdf_path)?;
        if texts.iter().all(|page| page.trim().is_empty()) {
            return Err(SourceUnreadable::new(format!(
                "{} has no text layer",
                pdf_path.display()
            ))
            .into());
        }

        let mut words = extract_words_with_pdftohtml(pdf_path)?;
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| ReportPage {
                text,
                words: words.remove(&(index + 1)).unwrap_or_default(),
            })
            .collect::<Vec<ReportPage>>();

        info!(path = %pdf_path.display(), pages = pages.len(), "read pdf pages");
        Ok(Self { pages })
    }

    pub fn from_text_dump(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let raw = String::from_utf8_lossy(&raw);
        let pages = split_form_feed_pages(&raw);
        if pages.iter().all(|page| page.trim().is_empty()) {
            return Err(SourceUnreadable::new(format!("{} is empty", path.display())).into());
        }

        info!(path = %path.display(), pages = pages.len(), "read text dump pages");
        Ok(Self::from_text_pages(pages))
    }

    pub fn from_text_pages<S: Into<String>>(pages: impl IntoIterator<Item = S>) -> Self {
        let pages = pages
            .into_iter()
            .map(|text| {
                let text = text.into();
                let words = synthesize_words(&text);
                ReportPage { text, words }
            })
            .collect();
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_text(&self, page: usize) -> &str {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .map(|page| page.text.as_str())
            .unwrap_or("")
    }

    pub fn page_words(&self, page: usize) -> &[PageWord] {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .map(|page| page.words.as_slice())
            .unwrap_or(&[])
    }

    pub fn lines_between(&self, start: usize, end: usize) -> Vec<PageLine<'_>> {
        let start = start.max(1);
        let end = end.min(self.page_count() + 1);
        (start..end)
            .flat_map(|page| {
                self.page_text(page)
                    .lines()
                    .map(move |text| PageLine { page, text })
            })
            .collect()
    }
}

fn split_form_feed_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    pages
}

fn synthesize_words(text: &str) -> Vec<PageWord> {
    text.lines()
        .enumerate()
        .flat_map(|(line_index, line)| {
            let top = SYNTHETIC_LINE_HEIGHT * line_index as f64;
            line.split_whitespace().map(move |word| PageWord {
                text: word.to_string(),
                top,
                fontname: String::new(),
            })
        })
        .collect()
}

fn extract_pages_with_pdftotext(pdf_path: &Path) -> Result<Vec<String>> {
    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SourceUnreadable::new(format!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        ))
        .into());
    }

    Ok(split_form_feed_pages(&String::from_utf8_lossy(&output.stdout)))
}

fn extract_words_with_pdftohtml(pdf_path: &Path) -> Result<HashMap<usize, Vec<PageWord>>> {
    let output = Command::new("pdftohtml")
        .arg("-xml")
        .arg("-i")
        .arg("-zoom")
        .arg("1")
        .arg("-stdout")
        .arg(pdf_path)
        .output()
        .with_context(|| format!("failed to execute pdftohtml for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SourceUnreadable::new(format!(
            "pdftohtml returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        ))
        .into());
    }

    parse_pdftohtml_xml(&String::from_utf8_lossy(&output.stdout))
}

fn parse_pdftohtml_xml(xml: &str) -> Result<HashMap<usize, Vec<PageWord>>> {
    let page_regex =
        Regex::new(r#"<page number="(\d+)""#).context("failed to compile page regex")?;
    let fontspec_regex = Regex::new(r#"<fontspec id="(\d+)"[^>]*family="([^"]*)""#)
        .context("failed to compile fontspec regex")?;
    let text_regex = Regex::new(r#"<text top="(-?[\d.]+)"[^>]*font="(\d+)"[^>]*>(.*?)</text>"#)
        .context("failed to compile text run regex")?;
    let tag_regex = Regex::new(r"<[^>]+>").context("failed to compile tag regex")?;

    let mut fonts = HashMap::<String, String>::new();
    let mut words = HashMap::<usize, Vec<PageWord>>::new();
    let mut current_page = 0usize;

    for line in xml.lines() {
        if let Some(captures) = page_regex.captures(line) {
            current_page = captures[1].parse::<usize>().unwrap_or(current_page + 1);
            continue;
        }

        if let Some(captures) = fontspec_regex.captures(line) {
            fonts.insert(captures[1].to_string(), captures[2].to_string());
            continue;
        }

        let Some(captures) = text_regex.captures(line) else {
            continue;
        };
        let top = captures[1].parse::<f64>().unwrap_or_default();
        let fontname = fonts.get(&captures[2]).cloned().unwrap_or_default();
        let content = decode_entities(&tag_regex.replace_all(&captures[3], " "));

        let page_words = words.entry(current_page).or_default();
        for token in content.split_whitespace() {
            page_words.push(PageWord {
                text: token.to_string(),
                top,
                fontname: fontname.clone(),
            });
        }
    }

    Ok(words)
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#160;", " ")
        .replace('\u{00a0}', " ")
}

pub fn tool_version(program: &str) -> Option<String> {
    let output = Command::new(program).arg("-v").output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdftohtml_runs_become_words_with_font_and_top() {
        let xml = r##"<pdf2xml>
<page number="1" position="absolute" top="0" left="0" height="792" width="612">
	<fontspec id="0" size="9" family="Arial-BoldMT" color="#000000"/>
<text top="40" left="36" width="200" height="10" font="0"><b>Vanguard 500 Index Adm</b> VFIAX</text>
</page>
<page number="2" position="absolute" top="0" left="0" height="792" width="612">
<text top="55.5" left="36" width="80" height="10" font="0">Benchmark: S&amp;P 500</text>
</page>
</pdf2xml>"##;

        let words = parse_pdftohtml_xml(xml).expect("xml parses");
        let first = &words[&1];
        assert_eq!(first.len(), 5);
        assert_eq!(first[4].text, "VFIAX");
        assert_eq!(first[0].fontname, "Arial-BoldMT");
        assert_eq!(first[0].top, 40.0);

        let second = &words[&2];
        assert_eq!(second[1].text, "S&P");
        assert_eq!(second[0].top, 55.5);
    }

    #[test]
    fn text_pages_are_one_based_and_bounded() {
        let pages = ReportPages::from_text_pages(["alpha\nbeta", "gamma"]);
        assert_eq!(pages.page_count(), 2);
        assert_eq!(pages.page_text(1), "alpha\nbeta");
        assert_eq!(pages.page_text(0), "");
        assert_eq!(pages.page_text(3), "");
        assert_eq!(pages.page_words(1)[1].top, SYNTHETIC_LINE_HEIGHT);

        let lines = pages.lines_between(1, 10);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], PageLine { page: 2, text: "gamma" });
    }

    #[test]
    fn non_pdf_bytes_are_source_unreadable() {
        let error = ReportPages::from_pdf(Path::new("report.pdf"), b"not a pdf")
            .expect_err("must reject");
        assert!(error.downcast_ref::<SourceUnreadable>().is_some());
    }

    #[test]
    fn trailing_blank_pages_are_dropped() {
        let pages = split_form_feed_pages("one\u{000C}two\u{000C}\n\u{000C}");
        assert_eq!(pages, vec!["one".to_string(), "two".to_string()]);
    }
}
