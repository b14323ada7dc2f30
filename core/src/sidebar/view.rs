use crate::sidebar::rows::SidebarRow;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarSection {
    pub title: &'static str,
    pub rows: Vec<SidebarRow>,
}

/// Snapshot of the whole sidebar tree, ready for a frontend or the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarView {
    pub sections: Vec<SidebarSection>,
}

impl SidebarView {
    pub fn section(&self, title: &str) -> Option<&SidebarSection> {
        self.sections.iter().find(|section| section.title == title)
    }
}

impl fmt::Display for SidebarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "{}", section.title)?;
            if section.rows.is_empty() {
                writeln!(f, "  (empty)")?;
            }
            for row in &section.rows {
                match row {
                    SidebarRow::Field(field) => writeln!(f, "  {}: {}", field.name, field.value)?,
                    SidebarRow::Coordinates(coords) => match &coords.cell.link {
                        Some(link) => {
                            writeln!(f, "  {}: {} <{}>", coords.name, coords.cell.text, link)?
                        }
                        None => writeln!(f, "  {}: {}", coords.name, coords.cell.text)?,
                    },
                    SidebarRow::Marker(marker) => {
                        let actions = match (marker.deletable, marker.detectable) {
                            (true, true) => "[del][detect] ",
                            (true, false) => "[del] ",
                            (false, true) => "[detect] ",
                            (false, false) => "",
                        };
                        writeln!(f, "  {}{}: {}", actions, marker.label, marker.text)?
                    }
                    SidebarRow::QaCheckbox(checkbox) => writeln!(
                        f,
                        "  {}: [{}]",
                        checkbox.name,
                        if checkbox.checked { "x" } else { " " }
                    )?,
                    SidebarRow::QaFlag(picker) => {
                        let buttons: Vec<String> = picker
                            .buttons
                            .iter()
                            .map(|b| {
                                if b.checked {
                                    format!("<{}>", b.level)
                                } else {
                                    format!("[{}]", b.level)
                                }
                            })
                            .collect();
                        writeln!(f, "  {}: {} {}", picker.name, buttons.join(""), picker.summary)?
                    }
                    SidebarRow::QaComment(comment) => {
                        writeln!(f, "  {}: {}", comment.field.name(), comment.text)?
                    }
                }
            }
        }
        Ok(())
    }
}
