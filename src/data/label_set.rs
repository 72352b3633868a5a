use serde::{Deserialize, Serialize};

/// Ordered class names, indexed implicitly by class id.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet(Vec<String>);

impl std::ops::Deref for LabelSet {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl LabelSet {
    /// Label for a class id, if the model declared one.
    pub fn label(&self, class_id: usize) -> Option<&str> {
        self.0.get(class_id).map(String::as_str)
    }

    pub(crate) fn replace(&mut self, labels: Vec<String>) {
        self.0 = labels;
    }
}
