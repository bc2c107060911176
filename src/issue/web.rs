use crate::model::Modification;

/// Fills [`Modification::url`] from a template.
///
/// `{0}` is replaced by the full path and `{1}` by the change number, e.g.
/// `https://svn.example.org/viewvc{0}?revision={1}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebUrlBuilder {
    template: String,
}

impl WebUrlBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn url_for(&self, modification: &Modification) -> String {
        self.template
            .replace("{0}", &modification.full_path())
            .replace("{1}", &modification.change_number)
    }

    pub fn setup_modifications(&self, modifications: &mut [Modification]) {
        for modification in modifications {
            modification.url = Some(self.url_for(modification));
        }
    }
}
