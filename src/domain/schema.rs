//! Static interview schema: section identities, ordering, field lists, and
//! the rendering strategy each section uses in the paginated document.
//!
//! The schema is defined once and never mutated. Both compilers, the
//! inclusion predicate, and the progress reporter consume this table
//! generically instead of branching per section.

use serde::{Deserialize, Serialize};

/// Stable key of an interview section, in document order.
///
/// The serialized form is the camelCase key used in persisted snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    AboutMe,
    Contacts,
    Financial,
    Insurance,
    Property,
    Digital,
    Legal,
    Debts,
    Business,
    Dependents,
    Wishes,
    Verification,
}

impl SectionId {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::AboutMe => "aboutMe",
            SectionId::Contacts => "contacts",
            SectionId::Financial => "financial",
            SectionId::Insurance => "insurance",
            SectionId::Property => "property",
            SectionId::Digital => "digital",
            SectionId::Legal => "legal",
            SectionId::Debts => "debts",
            SectionId::Business => "business",
            SectionId::Dependents => "dependents",
            SectionId::Wishes => "wishes",
            SectionId::Verification => "verification",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        SECTIONS
            .iter()
            .find(|def| def.id.as_str() == key)
            .map(|def| def.id)
    }
}

/// Whether a section holds one fixed group of fields or an ordered list of
/// repeatable items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionShape {
    FixedGroup,
    RepeatableList,
}

/// How a field participates in rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Ordinary text value, rendered by both compilers.
    Text,
    /// A `data:image/...;base64,` payload rendered as an image by the layout
    /// compiler and omitted from text output.
    Signature,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn text(key: &'static str, label: &'static str) -> FieldDef {
    FieldDef {
        key,
        label,
        kind: FieldKind::Text,
    }
}

/// Per-section rendering strategy for the paginated document.
///
/// Strategy assignment is fixed configuration, not inferred from item counts:
/// the pairing threshold applies only where a section declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStrategy {
    /// Label plus wrapped body lines per populated field, no card chrome.
    FreeText,
    /// One full-width card per populated item.
    CardPerItem,
    /// Items paired two per row while the populated count stays at or below
    /// `max_items`; above it, one full-width card per item.
    TwoColumnCards { max_items: usize },
    /// Summary table over `columns`, followed by a detail card for each item
    /// whose `notes_field` is populated.
    Table {
        columns: &'static [&'static str],
        notes_field: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct SectionDef {
    pub id: SectionId,
    /// Position label shown in headings ("A".."L").
    pub letter: char,
    pub title: &'static str,
    pub shape: SectionShape,
    pub strategy: SectionStrategy,
    pub fields: &'static [FieldDef],
    /// Most identifying field of a repeatable item, used for sub-headings.
    pub title_field: Option<&'static str>,
    /// Category field used when the identifying field is empty.
    pub fallback_field: Option<&'static str>,
}

impl SectionDef {
    pub fn field(&self, key: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }
}

/// The interview schema in document order.
pub static SECTIONS: &[SectionDef] = &[
    SectionDef {
        id: SectionId::AboutMe,
        letter: 'A',
        title: "The Basics",
        shape: SectionShape::FixedGroup,
        strategy: SectionStrategy::FreeText,
        fields: &[
            text("fullName", "Full name"),
            text("dateOfBirth", "Date of birth"),
            text("location", "Location"),
            text("reason", "Why this document exists"),
            text("intendedFor", "Who this is for"),
            text("personalContext", "Personal context"),
        ],
        title_field: None,
        fallback_field: None,
    },
    SectionDef {
        id: SectionId::Contacts,
        letter: 'B',
        title: "Immediate Contacts",
        shape: SectionShape::RepeatableList,
        strategy: SectionStrategy::TwoColumnCards { max_items: 6 },
        fields: &[
            text("name", "Name"),
            text("role", "Role"),
            text("relationship", "Relationship"),
            text("phone", "Phone"),
            text("email", "Email"),
            text("notes", "Notes"),
        ],
        title_field: Some("name"),
        fallback_field: Some("role"),
    },
    SectionDef {
        id: SectionId::Financial,
        letter: 'C',
        title: "Financial Accounts",
        shape: SectionShape::RepeatableList,
        strategy: SectionStrategy::Table {
            columns: &["institution", "accountType", "approxValue", "hasBeneficiary"],
            notes_field: "accessNotes",
        },
        fields: &[
            text("institution", "Institution"),
            text("accountType", "Account type"),
            text("approxValue", "Approximate value"),
            text("hasBeneficiary", "Named beneficiary"),
            text("accessNotes", "How to access"),
        ],
        title_field: Some("institution"),
        fallback_field: Some("accountType"),
    },
    SectionDef {
        id: SectionId::Insurance,
        letter: 'D',
        title: "Insurance",
        shape: SectionShape::RepeatableList,
        strategy: SectionStrategy::CardPerItem,
        fields: &[
            text("carrier", "Carrier"),
            text("insuranceType", "Type"),
            text("policyNumberLocation", "Policy number location"),
            text("agentContact", "Agent"),
            text("isEmployerProvided", "Through employer"),
            text("employerContact", "Employer contact"),
            text("notes", "Notes"),
        ],
        title_field: Some("carrier"),
        fallback_field: Some("insuranceType"),
    },
    SectionDef {
        id: SectionId::Property,
        letter: 'E',
        title: "Property & Assets",
        shape: SectionShape::RepeatableList,
        strategy: SectionStrategy::CardPerItem,
        fields: &[
            text("propertyType", "Type"),
            text("description", "Description"),
            text("location", "Location"),
            text("deedTitleLocation", "Deed/title location"),
            text("hasMortgage", "Has mortgage/lien"),
            text("notes", "Notes"),
        ],
        title_field: Some("description"),
        fallback_field: Some("propertyType"),
    },
    SectionDef {
        id: SectionId::Digital,
        letter: 'F',
        title: "Digital Life",
        shape: SectionShape::FixedGroup,
        strategy: SectionStrategy::FreeText,
        fields: &[
            text("emailAccounts", "Email accounts"),
            text("passwordManager", "Password manager"),
            text("twoFactorAuth", "Two-factor authentication"),
            text("socialMediaWishes", "Social media"),
            text("cloudStorage", "Cloud storage"),
            text("subscriptions", "Subscriptions & recurring payments"),
            text("crypto", "Cryptocurrency"),
            text("domainNames", "Domain names & websites"),
            text("digitalPurchases", "Digital purchases"),
            text("loyaltyPrograms", "Loyalty programs"),
            text("otherDigital", "Other digital"),
        ],
        title_field: None,
        fallback_field: None,
    },
    SectionDef {
        id: SectionId::Legal,
        letter: 'G',
        title: "Legal Documents",
        shape: SectionShape::RepeatableList,
        strategy: SectionStrategy::Table {
            columns: &["documentType", "location", "lastUpdated"],
            notes_field: "notes",
        },
        fields: &[
            text("documentType", "Document"),
            text("location", "Location"),
            text("lastUpdated", "Last updated"),
            text("notes", "Notes"),
        ],
        title_field: Some("documentType"),
        fallback_field: None,
    },
    SectionDef {
        id: SectionId::Debts,
        letter: 'H',
        title: "Debts & Obligations",
        shape: SectionShape::RepeatableList,
        strategy: SectionStrategy::CardPerItem,
        fields: &[
            text("direction", "Direction"),
            text("debtType", "Type"),
            text("lender", "Lender"),
            text("approxBalance", "Approximate balance"),
            text("isCosigned", "Co-signed"),
            text("payoffNotes", "Payoff notes"),
        ],
        title_field: Some("lender"),
        fallback_field: Some("debtType"),
    },
    SectionDef {
        id: SectionId::Business,
        letter: 'I',
        title: "Business Interests",
        shape: SectionShape::FixedGroup,
        strategy: SectionStrategy::FreeText,
        fields: &[
            text("hasBusiness", "Has business interests"),
            text("entityType", "Entity type"),
            text("businessName", "Business name"),
            text("keyContacts", "Key contacts"),
            text("operatingAgreementLocation", "Operating agreement location"),
            text("bankAccountAccess", "Bank account access"),
            text("successionPlan", "Succession plan"),
            text("otherBusinessNotes", "Other notes"),
        ],
        title_field: None,
        fallback_field: None,
    },
    SectionDef {
        id: SectionId::Dependents,
        letter: 'J',
        title: "Dependents & Care",
        shape: SectionShape::FixedGroup,
        strategy: SectionStrategy::FreeText,
        fields: &[
            text("minorChildren", "Minor children"),
            text("guardianshipPreferences", "Guardianship preferences"),
            text("elderlyDependents", "Elderly dependents"),
            text("pets", "Pets"),
            text("specialNeeds", "Special needs"),
            text("otherCareNotes", "Other care notes"),
        ],
        title_field: None,
        fallback_field: None,
    },
    SectionDef {
        id: SectionId::Wishes,
        letter: 'K',
        title: "Wishes & Messages",
        shape: SectionShape::FixedGroup,
        strategy: SectionStrategy::FreeText,
        fields: &[
            text("healthcareWishes", "Healthcare wishes"),
            text("funeralPreferences", "Funeral or memorial preferences"),
            text("organDonation", "Organ donation"),
            text("personalMessages", "Personal messages"),
            text("valuesStatement", "Values & what matters most"),
            text("otherWishes", "Other wishes"),
        ],
        title_field: None,
        fallback_field: None,
    },
    SectionDef {
        id: SectionId::Verification,
        letter: 'L',
        title: "Sign & Finish",
        shape: SectionShape::FixedGroup,
        strategy: SectionStrategy::FreeText,
        fields: &[
            text("fullName", "Full name"),
            text("verificationDate", "Date"),
            text("familyPassphrase", "Family passphrase"),
            FieldDef {
                key: "signatureData",
                label: "Signature",
                kind: FieldKind::Signature,
            },
        ],
        title_field: None,
        fallback_field: None,
    },
];

/// Look up a section definition by id. Every `SectionId` resolves.
pub fn section(id: SectionId) -> &'static SectionDef {
    SECTIONS
        .iter()
        .find(|def| def.id == id)
        .expect("every SectionId has a schema entry")
}
