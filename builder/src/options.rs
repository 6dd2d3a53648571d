/// Tuning knobs of a parse call.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseOptions {
    /// Total characters of entity replacement text accepted before the amplification ratio
    /// is checked at all.
    pub entity_expansion_threshold: usize,
    /// Largest accepted ratio of replacement characters to input characters once the
    /// threshold is crossed.
    pub entity_expansion_max_amplification: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            entity_expansion_threshold: 1_000_000,
            entity_expansion_max_amplification: 5.0,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        ParseOptions::default()
    }

    pub fn entity_expansion_threshold(mut self, value: usize) -> Self {
        self.entity_expansion_threshold = value;
        self
    }

    pub fn entity_expansion_max_amplification(mut self, value: f64) -> Self {
        self.entity_expansion_max_amplification = value;
        self
    }
}

// -----------------------------------------------------------------------------------------------


// -----------------------------------------------------------------------------------------------
