//! Canned demo snapshot: a believable, fully-populated interview used by the
//! demo-data toggle and as a rich fixture in tests. Built through the
//! reducer so it can only contain states the action vocabulary can reach.

use once_cell::sync::Lazy;

use crate::domain::actions::{Action, apply};
use crate::domain::schema::SectionId;
use crate::domain::state::InterviewState;

static DEMO: Lazy<InterviewState> = Lazy::new(build);

/// A copy of the demo snapshot.
pub fn demo_state() -> InterviewState {
    DEMO.clone()
}

fn build() -> InterviewState {
    let mut state = InterviewState::initial();

    let set = |state: &InterviewState, section: SectionId, field: &str, value: &str| {
        apply(
            state,
            Action::SetField {
                section,
                field: field.to_string(),
                value: value.to_string(),
            },
        )
    };

    state = set(&state, SectionId::AboutMe, "fullName", "Alex Rivera");
    state = set(&state, SectionId::AboutMe, "dateOfBirth", "March 14, 1968");
    state = set(&state, SectionId::AboutMe, "location", "Portland, Oregon");
    state = set(
        &state,
        SectionId::AboutMe,
        "reason",
        "Just being proactive. Everyone should do this.",
    );
    state = set(&state, SectionId::AboutMe, "intendedFor", "Sam (spouse) and our two kids");
    state = set(
        &state,
        SectionId::AboutMe,
        "personalContext",
        "I keep our paperwork scattered across a filing cabinet, a safe, and three email \
         accounts. This letter is the map.",
    );

    state = item(&state, SectionId::Contacts, 0, &[
        ("name", "Sam Rivera"),
        ("role", "Spouse / Partner"),
        ("relationship", "Spouse"),
        ("phone", "503-555-0114"),
        ("email", "sam.rivera@example.com"),
    ]);
    state = push_item(&state, SectionId::Contacts, &[
        ("name", "Dana Okafor"),
        ("role", "Attorney"),
        ("phone", "503-555-0188"),
        ("notes", "Drafted the will in 2022; firm is Okafor & Lee."),
    ]);
    state = push_item(&state, SectionId::Contacts, &[
        ("name", "Priya Shah"),
        ("role", "Financial advisor"),
        ("phone", "971-555-0102"),
        ("email", "priya@example-advisors.com"),
    ]);

    state = item(&state, SectionId::Financial, 0, &[
        ("institution", "First Cascade Credit Union"),
        ("accountType", "Checking"),
        ("approxValue", "$8,200"),
        ("hasBeneficiary", "Yes, Sam"),
        ("accessNotes", "Joint account; Sam already has full access and a debit card."),
    ]);
    state = push_item(&state, SectionId::Financial, &[
        ("institution", "Vanguard"),
        ("accountType", "401(k)"),
        ("approxValue", "$310,000"),
        ("hasBeneficiary", "Yes, Sam (primary), kids (contingent)"),
        ("accessNotes", "Statements arrive by mail each quarter; login is in the password manager."),
    ]);
    state = push_item(&state, SectionId::Financial, &[
        ("institution", "Coinbase"),
        ("accountType", "Cryptocurrency"),
        ("approxValue", "$4,500"),
        ("accessNotes", "Recovery phrase is on paper in the fire safe, envelope marked 'C'."),
    ]);

    state = item(&state, SectionId::Insurance, 0, &[
        ("carrier", "Northwestern Mutual"),
        ("insuranceType", "Life insurance"),
        ("policyNumberLocation", "Policy folder in the filing cabinet, top drawer"),
        ("agentContact", "Marcus Webb, 503-555-0171"),
        ("isEmployerProvided", "No"),
    ]);
    state = push_item(&state, SectionId::Insurance, &[
        ("carrier", "Providence Health Plan"),
        ("insuranceType", "Health insurance"),
        ("isEmployerProvided", "Yes"),
        ("employerContact", "HR portal, benefits@employer.example"),
    ]);

    state = item(&state, SectionId::Property, 0, &[
        ("propertyType", "Primary residence"),
        ("description", "House on Alder Street"),
        ("location", "4512 SE Alder St, Portland"),
        ("deedTitleLocation", "Fire safe, folder marked 'House'"),
        ("hasMortgage", "Yes, about $180,000 left with Umpqua Bank"),
    ]);
    state = push_item(&state, SectionId::Property, &[
        ("propertyType", "Safe deposit box"),
        ("location", "First Cascade, Belmont branch"),
        ("deedTitleLocation", "Key is on the ring in the kitchen drawer; Sam is a co-signer"),
    ]);

    state = set(
        &state,
        SectionId::Digital,
        "emailAccounts",
        "Personal: alex.rivera@example.com (primary). Old account: ar1968@example.net, only \
         used for a few subscriptions.",
    );
    state = set(
        &state,
        SectionId::Digital,
        "passwordManager",
        "Bitwarden. The emergency kit with the master password is in the fire safe.",
    );
    state = set(
        &state,
        SectionId::Digital,
        "twoFactorAuth",
        "Authenticator app on my phone; backup codes printed and stored with the emergency kit.",
    );
    state = set(
        &state,
        SectionId::Digital,
        "socialMediaWishes",
        "Memorialize the accounts, please do not delete the photos.",
    );
    state = set(
        &state,
        SectionId::Digital,
        "subscriptions",
        "Streaming and news subscriptions all bill to the shared credit card; cancel what \
         nobody uses.",
    );

    state = item(&state, SectionId::Legal, 0, &[
        ("documentType", "Will"),
        ("location", "Original with Dana Okafor; copy in the fire safe"),
        ("lastUpdated", "June 2022"),
    ]);
    state = push_item(&state, SectionId::Legal, &[
        ("documentType", "Power of Attorney (Healthcare)"),
        ("location", "Fire safe, folder marked 'Legal'"),
        ("lastUpdated", "June 2022"),
        ("notes", "Sam is the agent; Dana has the signed original."),
    ]);
    state = push_item(&state, SectionId::Legal, &[
        ("documentType", "Birth certificate"),
        ("location", "Fire safe"),
    ]);

    state = item(&state, SectionId::Debts, 0, &[
        ("direction", "I owe"),
        ("debtType", "Mortgage"),
        ("lender", "Umpqua Bank"),
        ("approxBalance", "$180,000"),
        ("isCosigned", "Joint with Sam"),
    ]);
    state = push_item(&state, SectionId::Debts, &[
        ("direction", "I owe"),
        ("debtType", "Car loan"),
        ("lender", "First Cascade Credit Union"),
        ("approxBalance", "$9,400"),
        ("payoffNotes", "Auto-pays from checking on the 5th."),
    ]);

    state = set(&state, SectionId::Business, "hasBusiness", "Yes");
    state = set(&state, SectionId::Business, "businessName", "Rivera Woodworks LLC");
    state = set(&state, SectionId::Business, "entityType", "Single-member LLC");
    state = set(
        &state,
        SectionId::Business,
        "operatingAgreementLocation",
        "Digital copy in Bitwarden's notes; signed copy with Dana.",
    );
    state = set(
        &state,
        SectionId::Business,
        "successionPlan",
        "Wind it down. Finish open orders, sell the tools, close the shop lease.",
    );

    state = set(
        &state,
        SectionId::Dependents,
        "minorChildren",
        "Maya (14) and Leo (11).",
    );
    state = set(
        &state,
        SectionId::Dependents,
        "guardianshipPreferences",
        "If something happens to both of us: my sister Carmen in Seattle. This is in the will.",
    );
    state = set(&state, SectionId::Dependents, "pets", "One cat, Biscuit. Feeds twice a day.");

    state = set(
        &state,
        SectionId::Wishes,
        "funeralPreferences",
        "Cremation, small gathering, no formal service. Play something by Bill Evans.",
    );
    state = set(&state, SectionId::Wishes, "organDonation", "Yes, registered donor.");
    state = set(
        &state,
        SectionId::Wishes,
        "personalMessages",
        "Maya and Leo: the woodshop notebooks are for you. Sam: check the inside pocket of the \
         green jacket.",
    );

    state = set(&state, SectionId::Verification, "fullName", "Alex Rivera");
    state = set(&state, SectionId::Verification, "verificationDate", "August 2026");
    state = set(
        &state,
        SectionId::Verification,
        "familyPassphrase",
        "The name of the lake where we always camped",
    );

    state
}

fn item(
    state: &InterviewState,
    section: SectionId,
    index: usize,
    fields: &[(&str, &str)],
) -> InterviewState {
    let mut next = state.clone();
    for (field, value) in fields {
        next = apply(
            &next,
            Action::SetItemField {
                section,
                index,
                field: (*field).to_string(),
                value: (*value).to_string(),
            },
        );
    }
    next
}

fn push_item(state: &InterviewState, section: SectionId, fields: &[(&str, &str)]) -> InterviewState {
    let appended = apply(state, Action::AppendItem { section });
    let index = appended.record(section).items().len() - 1;
    item(&appended, section, index, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::progress::section_progress;

    #[test]
    fn demo_snapshot_completes_every_section() {
        let progress = section_progress(&demo_state());
        assert!(progress.iter().all(|section| section.complete));
    }

    #[test]
    fn demo_snapshot_is_stable_within_a_process() {
        assert_eq!(demo_state(), demo_state());
    }
}
