// File: ./src/model/subject.rs
// Parsed syllabus records. Rebuilt from the syllabus text on every launch.

/// One chapter entry under "Course Contents".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unit {
    pub label: String,
    pub name: String,
    /// Hour allocation as written, e.g. `"6"`. Empty when the heading had none.
    pub hours: String,
    pub topics: Vec<String>,
}

impl Unit {
    /// Display heading, also the value stored as a subject's ongoing chapter.
    pub fn heading(&self) -> String {
        format!("Unit {}: {}", self.label, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Subject {
    pub title: String,
    pub course_no: String,
    pub nature: String,
    pub semester: String,
    pub full_marks: String,
    pub pass_marks: String,
    pub credit_hrs: String,
    pub description: String,
    pub objectives: String,
    pub units: Vec<Unit>,
    pub laboratory_works: String,
    pub text_books: String,
    pub reference_books: String,
}

impl Subject {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn total_hours(&self) -> u32 {
        self.units
            .iter()
            .filter_map(|u| u.hours.parse::<u32>().ok())
            .sum()
    }
}
