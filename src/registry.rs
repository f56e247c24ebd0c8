// Named format registry.
//
// An explicit, constructed-once object owned by the caller. Labels follow
// the convention of naming a format by its total encoded width: `f32` is
// the 32-bit IEEE single format and `recf33` its 33-bit recoded pair.

use std::collections::HashMap;

use log::debug;

use crate::formats::{IeeeFormat, RecodedFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedFormat {
    Ieee(IeeeFormat),
    Recoded(RecodedFormat),
}

#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: HashMap<String, NamedFormat>,
}

impl FormatRegistry {
    pub fn new() -> FormatRegistry {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    // Registry pre-loaded with the half, single and double precision
    // formats and their recoded counterparts.
    pub fn with_standard_formats() -> FormatRegistry {
        let mut registry = FormatRegistry::new();
        registry.register_ieee("f16", IeeeFormat::HALF);
        registry.register_ieee("f32", IeeeFormat::SINGLE);
        registry.register_ieee("f64", IeeeFormat::DOUBLE);
        registry.register_recoded("recf17", RecodedFormat::HALF);
        registry.register_recoded("recf33", RecodedFormat::SINGLE);
        registry.register_recoded("recf65", RecodedFormat::DOUBLE);
        registry
    }

    pub fn register_ieee(&mut self, label: &str, format: IeeeFormat) {
        self.register(label, NamedFormat::Ieee(format));
    }

    pub fn register_recoded(&mut self, label: &str, format: RecodedFormat) {
        self.register(label, NamedFormat::Recoded(format));
    }

    // Registering an existing label replaces the previous entry.
    pub fn register(&mut self, label: &str, format: NamedFormat) {
        if let Some(previous) = self.formats.insert(label.to_string(), format) {
            debug!("format label {:?} re-registered over {:?}", label, previous);
        }
    }

    pub fn get(&self, label: &str) -> Option<NamedFormat> {
        self.formats.get(label).copied()
    }

    pub fn ieee(&self, label: &str) -> Option<IeeeFormat> {
        match self.get(label) {
            Some(NamedFormat::Ieee(format)) => Some(format),
            _ => None,
        }
    }

    pub fn recoded(&self, label: &str) -> Option<RecodedFormat> {
        match self.get(label) {
            Some(NamedFormat::Recoded(format)) => Some(format),
            _ => None,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.formats.keys().map(|s| s.as_str()).collect();
        labels.sort_unstable();
        labels
    }
}
