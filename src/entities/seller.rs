//! Seller entity type

use serde::{Deserialize, Serialize};

use crate::core::entity::{set, Entity, Update};
use crate::core::identity::{EntityId, EntityPrefix};

/// A seller (sales representative) responsible for projects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Entity for Seller {
    const PREFIX: EntityPrefix = EntityPrefix::Sel;
    const KIND: &'static str = "seller";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fields supplied when creating a seller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSeller {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl NewSeller {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub(crate) fn into_seller(self, id: EntityId) -> Seller {
        Seller {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
        }
    }
}

/// Partial update for a seller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SellerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the phone
    pub phone: Option<Option<String>>,
}

impl SellerUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: Option<String>) -> Self {
        self.phone = Some(phone);
        self
    }
}

impl Update<Seller> for SellerUpdate {
    fn apply(self, target: &mut Seller) {
        set(&mut target.name, self.name);
        set(&mut target.email, self.email);
        set(&mut target.phone, self.phone);
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_email_keeps_phone() {
        let mut seller = NewSeller::new("Carlos", "carlos@empresa.com")
            .with_phone("(11) 91111-1111")
            .into_seller(EntityId::from("1"));

        let update = SellerUpdate::default().email("c@empresa.com");
        assert!(!update.is_empty());
        update.apply(&mut seller);

        assert_eq!(seller.email, "c@empresa.com");
        assert_eq!(seller.phone.as_deref(), Some("(11) 91111-1111"));
    }

    #[test]
    fn test_empty_update() {
        assert!(SellerUpdate::default().is_empty());
    }
}
