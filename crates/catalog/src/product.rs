use core::str::FromStr;

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, Entity, Money, ProductId};

/// A purchasable product as supplied by the catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Money,
    /// URL or path of a product picture; absent for some products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            price,
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        if !self.id.is_positive() {
            return Err(DomainError::invalid_id(format!(
                "product ids must be positive (got {})",
                self.id
            )));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "product {} has an empty name",
                self.id
            )));
        }
        if self.price.is_negative() {
            return Err(DomainError::validation(format!(
                "product {} has a negative price",
                self.id
            )));
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Category selection for the product grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No filtering: every product in catalog order.
    #[default]
    All,
    /// Products whose category equals the given name exactly.
    Only(String),
}

impl CategoryFilter {
    pub const ALL: &'static str = "All";

    pub fn only(category: impl Into<String>) -> Self {
        Self::Only(category.into())
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => product.category == *category,
        }
    }
}

impl core::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(Self::ALL),
            CategoryFilter::Only(category) => f.write_str(category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }
        if s.eq_ignore_ascii_case(Self::ALL) {
            return Ok(CategoryFilter::All);
        }
        Ok(CategoryFilter::Only(s.to_string()))
    }
}
