// File: ./src/model/parser.rs
// Handles syllabus text parsing
use crate::model::subject::{Subject, Unit};
use regex::Regex;
use std::sync::LazyLock;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^"?Course Title\s*:\s*(.*?)"?$"#).expect("valid title regex")
});

static UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^Unit\s+([IVXLCDM]+|\d+)\s*:\s*(.*?)\s*(?:\(\s*(\d+(?:\.\d+)?)\s*H(?:ou)?rs?\.?\s*\))?\s*$",
    )
    .expect("valid unit regex")
});

static PAGE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^-+\s*PAGE\s+\d+\s*-+$").expect("valid page regex"));

static PAGE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,4}$").expect("valid page number regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderField {
    CourseNo,
    Nature,
    Semester,
    FullMarks,
    PassMarks,
    CreditHrs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Description,
    Objectives,
    Contents,
    Laboratory,
    TextBooks,
    ReferenceBooks,
}

static FIELD_PATTERNS: LazyLock<Vec<(Regex, HeaderField)>> = LazyLock::new(|| {
    [
        (r"(?i)^Course No\.?\s*:\s*(.*)$", HeaderField::CourseNo),
        (r"(?i)^Nature of (?:the )?Course\s*:\s*(.*)$", HeaderField::Nature),
        (r"(?i)^Semester\s*:\s*(.*)$", HeaderField::Semester),
        (r"(?i)^Full Marks\s*:\s*(.*)$", HeaderField::FullMarks),
        (r"(?i)^Pass Marks\s*:\s*(.*)$", HeaderField::PassMarks),
        (r"(?i)^Credit (?:Hrs|Hours)\.?\s*:\s*(.*)$", HeaderField::CreditHrs),
    ]
    .into_iter()
    .map(|(pattern, field)| (Regex::new(pattern).expect("valid field regex"), field))
    .collect()
});

static SECTION_PATTERNS: LazyLock<Vec<(Regex, Section)>> = LazyLock::new(|| {
    [
        (r"(?i)^Course Description\s*:\s*(.*)$", Section::Description),
        (r"(?i)^Course Objectives?\s*:\s*(.*)$", Section::Objectives),
        (r"(?i)^Course Contents?\s*:\s*(.*)$", Section::Contents),
        (
            r"(?i)^(?:Laboratory Works?|Lab Works?)\s*:\s*(.*)$",
            Section::Laboratory,
        ),
        (r"(?i)^Text Books?\s*:\s*(.*)$", Section::TextBooks),
        (r"(?i)^Reference Books?\s*:\s*(.*)$", Section::ReferenceBooks),
    ]
    .into_iter()
    .map(|(pattern, section)| (Regex::new(pattern).expect("valid section regex"), section))
    .collect()
});

/// Accumulates the lines of one "Course Title:" block.
struct SubjectBuilder {
    subject: Subject,
    section: Section,
    description: Vec<String>,
    objectives: Vec<String>,
    laboratory: Vec<String>,
    text_books: Vec<String>,
    reference_books: Vec<String>,
}

impl SubjectBuilder {
    fn new(title: &str) -> Self {
        Self {
            subject: Subject::new(title),
            section: Section::Header,
            description: vec![],
            objectives: vec![],
            laboratory: vec![],
            text_books: vec![],
            reference_books: vec![],
        }
    }

    fn field_mut(&mut self, field: HeaderField) -> &mut String {
        match field {
            HeaderField::CourseNo => &mut self.subject.course_no,
            HeaderField::Nature => &mut self.subject.nature,
            HeaderField::Semester => &mut self.subject.semester,
            HeaderField::FullMarks => &mut self.subject.full_marks,
            HeaderField::PassMarks => &mut self.subject.pass_marks,
            HeaderField::CreditHrs => &mut self.subject.credit_hrs,
        }
    }

    fn feed(&mut self, line: &str) {
        for (re, field) in FIELD_PATTERNS.iter() {
            if let Some(caps) = re.captures(line) {
                let slot = self.field_mut(*field);
                // First occurrence wins
                if slot.is_empty() {
                    *slot = caps[1].trim().to_string();
                }
                self.section = Section::Header;
                return;
            }
        }

        for (re, section) in SECTION_PATTERNS.iter() {
            if let Some(caps) = re.captures(line) {
                self.section = *section;
                let rest = caps[1].trim();
                if !rest.is_empty() {
                    self.push(rest);
                }
                return;
            }
        }

        self.push(line);
    }

    fn push(&mut self, line: &str) {
        match self.section {
            Section::Header => {}
            Section::Description => self.description.push(line.to_string()),
            Section::Objectives => self.objectives.push(line.to_string()),
            Section::Laboratory => self.laboratory.push(line.to_string()),
            Section::TextBooks => self.text_books.push(line.to_string()),
            Section::ReferenceBooks => self.reference_books.push(line.to_string()),
            Section::Contents => {
                if let Some(caps) = UNIT_RE.captures(line) {
                    self.subject.units.push(Unit {
                        label: caps[1].to_string(),
                        name: caps[2].trim().to_string(),
                        hours: caps
                            .get(3)
                            .map(|m| m.as_str().to_string())
                            .unwrap_or_default(),
                        topics: vec![],
                    });
                } else if let Some(unit) = self.subject.units.last_mut() {
                    unit.topics.push(line.to_string());
                }
                // Lines before the first unit heading are dropped.
            }
        }
    }

    fn finish(mut self) -> Subject {
        self.subject.description = self.description.join("\n");
        self.subject.objectives = self.objectives.join("\n");
        self.subject.laboratory_works = self.laboratory.join("\n");
        self.subject.text_books = self.text_books.join("\n");
        self.subject.reference_books = self.reference_books.join("\n");
        self.subject
    }
}

fn is_page_artifact(line: &str) -> bool {
    PAGE_MARKER_RE.is_match(line) || PAGE_NUMBER_RE.is_match(line)
}

/// Parses a syllabus text blob into subjects, in source order.
///
/// Best effort: a block starts at every `Course Title:` line, and any label or
/// section that cannot be found leaves its field empty. This never fails.
pub fn parse(text: &str) -> Vec<Subject> {
    let mut subjects = Vec::new();
    let mut current: Option<SubjectBuilder> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || is_page_artifact(line) {
            continue;
        }

        if let Some(caps) = TITLE_RE.captures(line) {
            if let Some(done) = current.take() {
                subjects.push(done.finish());
            }
            current = Some(SubjectBuilder::new(caps[1].trim()));
            continue;
        }

        if let Some(builder) = current.as_mut() {
            builder.feed(line);
        }
    }

    if let Some(done) = current {
        subjects.push(done.finish());
    }
    subjects
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_BLOCK: &str = "\
Course Title: Data Structures
Course No: CS201
Nature of the Course: Theory + Lab
Semester: III
Full Marks: 60+20+20
Pass Marks: 24+8+8
Credit Hrs: 3

Course Description: Linear and non-linear
data structures.

Course Objectives: Implement common structures.

Course Contents:

Unit I: Arrays (6 Hrs)
1.1 Static arrays
1.2 Dynamic arrays

Unit II: Trees (8Hrs.)
2.1 Binary trees

Laboratory Works:
Implement every structure in C.

Text Books:
1. Some Book, 2nd Edition

Reference Books:
1. Another Book
2. Third Book
";

    #[test]
    fn test_minimal_course_block() {
        let text = "Course Title: Data Structures\nCourse No: CS201\nCourse Contents:\nUnit I: Arrays (6 Hrs)\n";
        let subjects = parse(text);

        assert_eq!(subjects.len(), 1);
        let s = &subjects[0];
        assert_eq!(s.title, "Data Structures");
        assert_eq!(s.course_no, "CS201");
        assert_eq!(s.units.len(), 1);
        assert_eq!(s.units[0].label, "I");
        assert_eq!(s.units[0].name, "Arrays");
        assert_eq!(s.units[0].hours, "6");
    }

    #[test]
    fn test_full_block_fields() {
        let subjects = parse(FULL_BLOCK);
        assert_eq!(subjects.len(), 1);
        let s = &subjects[0];

        assert_eq!(s.nature, "Theory + Lab");
        assert_eq!(s.semester, "III");
        assert_eq!(s.full_marks, "60+20+20");
        assert_eq!(s.pass_marks, "24+8+8");
        assert_eq!(s.credit_hrs, "3");
        assert_eq!(s.description, "Linear and non-linear\ndata structures.");
        assert_eq!(s.objectives, "Implement common structures.");
        assert_eq!(s.laboratory_works, "Implement every structure in C.");
        assert_eq!(s.text_books, "1. Some Book, 2nd Edition");
        assert_eq!(s.reference_books, "1. Another Book\n2. Third Book");

        assert_eq!(s.units.len(), 2);
        assert_eq!(
            s.units[0].topics,
            vec!["1.1 Static arrays", "1.2 Dynamic arrays"]
        );
        assert_eq!(s.units[1].label, "II");
        assert_eq!(s.units[1].hours, "8");
        assert_eq!(s.total_hours(), 14);
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let text = "Course Title: Seminar\nCourse No: CS999\nCourse Contents:\nUnit 1: Talks (2 Hrs.)\n";
        let s = &parse(text)[0];

        assert!(s.laboratory_works.is_empty());
        assert!(s.text_books.is_empty());
        assert!(s.reference_books.is_empty());
        assert!(s.description.is_empty());
        assert!(s.semester.is_empty());
        assert_eq!(s.units[0].label, "1");
    }

    #[test]
    fn test_unit_without_hours() {
        let text = "Course Title: X\nCourse Contents:\nUnit 3: Wrap-up\n";
        let unit = &parse(text)[0].units[0];
        assert_eq!(unit.name, "Wrap-up");
        assert_eq!(unit.hours, "");
        assert_eq!(unit.heading(), "Unit 3: Wrap-up");
    }

    #[test]
    fn test_hour_suffix_spellings() {
        let text = "Course Title: X\nCourse Contents:\nUnit 1: Intro (5 Hours)\nUnit 2: Core (1 Hour)\nUnit 3: Lab (4 hrs.)\n";
        let units = &parse(text)[0].units;
        let got: Vec<(&str, &str)> = units
            .iter()
            .map(|u| (u.name.as_str(), u.hours.as_str()))
            .collect();
        assert_eq!(got, vec![("Intro", "5"), ("Core", "1"), ("Lab", "4")]);
    }

    #[test]
    fn test_page_artifacts_are_skipped() {
        let text = "\
Course Title: Networks
Course Contents:
Unit 1: Basics (4Hrs.)
1.1 Topologies

36


--- PAGE 2 ---

1.2 Models
";
        let unit = &parse(text)[0].units[0];
        assert_eq!(unit.topics, vec!["1.1 Topologies", "1.2 Models"]);
    }

    #[test]
    fn test_blocks_keep_source_order() {
        let text = "preamble that is ignored\nCourse Title: B\nCourse No: 2\n\"Course Title: A\"\nCourse No: 1\n";
        let subjects = parse(text);
        let titles: Vec<&str> = subjects.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert_eq!(subjects[1].course_no, "1");
    }

    #[test]
    fn test_lines_before_first_unit_are_ignored() {
        let text = "Course Title: X\nCourse Contents:\nsome intro\nUnit I: First (1 Hr)\n";
        let s = &parse(text)[0];
        assert_eq!(s.units.len(), 1);
        assert!(s.units[0].topics.is_empty());
        assert_eq!(s.units[0].hours, "1");
    }

    #[test]
    fn test_garbage_input_yields_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("no titles here\nUnit I: Orphan (2 Hrs)").is_empty());
    }
}
