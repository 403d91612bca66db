//! Cache key builders.
//!
//! Every key is `<entity class>:<id>`.

use std::fmt;

use beredskap_core::types::id::{CatalogResourceId, CommunityId, OfferId};

/// Kinds of cached entities. Each has its own TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    /// Shared resource offers.
    Offer,
    /// Token rotated on every offer invalidation.
    OfferRevision,
    /// Catalog resources.
    CatalogResource,
    /// Member lists returned by the membership gate.
    CommunityMembers,
}

impl EntityClass {
    /// Key segment for the class.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::OfferRevision => "offer-rev",
            Self::CatalogResource => "catalog",
            Self::CommunityMembers => "members",
        }
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key for one entity of `class`.
pub fn entity(class: EntityClass, id: impl fmt::Display) -> String {
    format!("{class}:{id}")
}

/// Cache key for an offer.
pub fn offer(id: OfferId) -> String {
    entity(EntityClass::Offer, id)
}

/// Cache key for an offer's revision token.
pub fn offer_revision(id: OfferId) -> String {
    entity(EntityClass::OfferRevision, id)
}

/// Cache key for a catalog resource.
pub fn catalog_resource(id: CatalogResourceId) -> String {
    entity(EntityClass::CatalogResource, id)
}

/// Cache key for a community's member list.
pub fn community_members(id: CommunityId) -> String {
    entity(EntityClass::CommunityMembers, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_offer_key() {
        let id = OfferId::from_uuid(Uuid::nil());
        assert_eq!(offer(id), "offer:00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_classes_do_not_collide() {
        let id = uuid::Uuid::now_v7();
        let offer_key = offer(OfferId::from_uuid(id));
        let catalog_key = catalog_resource(CatalogResourceId::from_uuid(id));
        let members_key = community_members(CommunityId::from_uuid(id));
        assert_ne!(offer_key, catalog_key);
        assert_ne!(offer_key, offer_revision(OfferId::from_uuid(id)));
        assert_ne!(catalog_key, members_key);
        assert!(members_key.starts_with("members:"));
    }
}
