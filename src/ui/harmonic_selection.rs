use crate::reader::Harmonic;

/// A row of F3..F13 check boxes under a title.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct HarmonicSelection {
    pub title: String,
    pub checked: [bool; 6],
}

impl HarmonicSelection {
    /// Only F3 is checked to start with.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            checked: [true, false, false, false, false, false],
        }
    }

    pub fn enabled(&self) -> Vec<Harmonic> {
        Harmonic::ALL
            .into_iter()
            .filter(|harmonic| self.checked[harmonic.index()])
            .collect()
    }

    pub fn is_checked(&self, harmonic: Harmonic) -> bool {
        self.checked[harmonic.index()]
    }

    pub fn set_checked(&mut self, harmonic: Harmonic, checked: bool) {
        self.checked[harmonic.index()] = checked;
    }

    /// Returns true when a box was toggled.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        ui.label(egui::RichText::new(&self.title).strong());
        ui.horizontal_wrapped(|ui| {
            for harmonic in Harmonic::ALL {
                let label = format!("F{}", harmonic.overtone());
                changed |= ui
                    .checkbox(&mut self.checked[harmonic.index()], label)
                    .changed();
            }
        });

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_f3_only() {
        let selection = HarmonicSelection::new("Plot Harmonic");
        assert_eq!(selection.enabled(), vec![Harmonic::F3]);
    }

    #[test]
    fn enabled_keeps_overtone_order() {
        let mut selection = HarmonicSelection::new("Fit Harmonics");
        selection.set_checked(Harmonic::F11, true);
        selection.set_checked(Harmonic::F5, true);
        selection.set_checked(Harmonic::F3, false);

        assert_eq!(selection.enabled(), vec![Harmonic::F5, Harmonic::F11]);
        assert!(selection.is_checked(Harmonic::F11));
        assert!(!selection.is_checked(Harmonic::F3));
    }
}
