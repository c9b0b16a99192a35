use std::fmt;

pub const NO_CATEGORY: &str = "no category";

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A national park service site. Immutable once built; `name` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    category: String,
    name: String,
    address: String,
    postal_code: String,
    phone: String,
}

impl Site {
    /// Applies the field defaults to raw page values. Returns `None` when the
    /// name is blank.
    ///
    /// * an empty `category` becomes `"no category"`
    /// * `address` is `"{city}, {state}"` only when both are present
    /// * absent `postal_code` / `phone` become empty strings
    pub fn from_parts(
        name: &str,
        category: &str,
        city: Option<&str>,
        state: Option<&str>,
        postal_code: Option<&str>,
        phone: Option<&str>,
    ) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let category = match category.trim() {
            "" => NO_CATEGORY.to_string(),
            c => c.to_string(),
        };

        let address = match (present(city), present(state)) {
            (Some(city), Some(state)) => format!("{}, {}", city, state),
            _ => String::new(),
        };

        Some(Site {
            category,
            name: name.to_string(),
            address,
            postal_code: postal_code.map(str::trim).unwrap_or_default().to_string(),
            phone: phone.map(str::trim).unwrap_or_default().to_string(),
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} {}",
            self.name, self.category, self.address, self.postal_code
        )
    }
}
