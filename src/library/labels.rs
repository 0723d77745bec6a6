use crate::foundation::{
    core::Label,
    error::{CollageError, CollageResult},
};

/// Ordered label names; ids are assigned from 1 in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelBook {
    names: Vec<String>,
}

impl LabelBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` and returns its id. Adding a known name returns the existing id.
    pub fn add(&mut self, name: &str) -> CollageResult<Label> {
        if let Some(label) = self.id(name) {
            return Ok(label);
        }
        let next = u8::try_from(self.names.len() + 1).map_err(|_| {
            CollageError::validation(format!(
                "cannot add label '{name}': at most {} labels fit a u8 mask",
                u8::MAX
            ))
        })?;
        self.names.push(name.to_string());
        Label::new(next)
    }

    pub fn id(&self, name: &str) -> Option<Label> {
        let idx = self.names.iter().position(|n| n == name)?;
        Label::new(u8::try_from(idx + 1).ok()?).ok()
    }

    pub fn name(&self, label: Label) -> Option<&str> {
        self.names
            .get(usize::from(label.get()) - 1)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Label)> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(i, n)| Some((n.as_str(), Label::new(u8::try_from(i + 1).ok()?).ok()?)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/library/labels.rs"]
mod tests;
