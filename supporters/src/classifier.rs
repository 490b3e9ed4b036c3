use crate::api::{AccountType, DisplayMember, FundingAccountKind, FundingContributor, Mode};

/// Maps raw funding platform contributors to `DisplayMember`s, keeping only
/// the ones belonging to `mode`.
///
/// # Arguments
/// * `contributors` - Raw records in the order the platform returned them
/// * `mode` - Requested category
/// * `profile_base_url` - Base URL of public profiles, member slug is appended
pub fn classify(contributors: &[FundingContributor], mode: Mode, profile_base_url: &str) -> Vec<DisplayMember> {
    let base = profile_base_url.trim_end_matches('/');
    contributors
        .iter()
        .filter(|contributor| keep(contributor, mode))
        .map(|contributor| display_member(contributor, base))
        .collect()
}

fn keep(contributor: &FundingContributor, mode: Mode) -> bool {
    match mode {
        Mode::Contributors => contributor.is_core || contributor.is_admin,
        Mode::Backers => contributor.is_backer && contributor.account.kind == FundingAccountKind::Individual,
        Mode::Sponsors => contributor.is_backer && contributor.account.kind == FundingAccountKind::Organization,
        Mode::All => true,
    }
}

fn display_member(contributor: &FundingContributor, base: &str) -> DisplayMember {
    let account = &contributor.account;
    let account_type = match account.kind {
        FundingAccountKind::Organization => AccountType::Organization,
        _ => AccountType::Individual,
    };
    DisplayMember {
        id: contributor.id.clone(),
        name: account.name.clone().unwrap_or_else(|| account.slug.clone()),
        image: account.image_url.clone(),
        profile_url: format!("{}/{}", base, account.slug),
        account_type,
        total_contributed: contributor.total_amount_contributed.clone(),
    }
}

/// Tests

#[cfg(test)]
use crate::api::{Amount, FundingAccount};

#[cfg(test)]
fn contributor(id: usize, is_admin: bool, is_core: bool, is_backer: bool, kind: FundingAccountKind) -> FundingContributor {
    FundingContributor {
        id: format!("c{}", id),
        roles: Vec::new(),
        is_admin,
        is_core,
        is_backer,
        total_amount_contributed: Some(Amount::new(10.0 * id as f64, Some("USD".to_string()))),
        account: FundingAccount {
            id: format!("a{}", id),
            name: Some(format!("name {}", id)),
            slug: format!("slug-{}", id),
            kind,
            image_url: None,
        },
    }
}

/// Every `{is_admin, is_core, is_backer} x {INDIVIDUAL, ORGANIZATION}` combination.
#[cfg(test)]
fn fixture() -> Vec<FundingContributor> {
    let mut contributors = Vec::new();
    for kind in [FundingAccountKind::Individual, FundingAccountKind::Organization] {
        for flags in 0..8u8 {
            let id = contributors.len();
            contributors.push(contributor(id, flags & 1 != 0, flags & 2 != 0, flags & 4 != 0, kind));
        }
    }
    contributors
}

#[cfg(test)]
fn ids(members: Vec<DisplayMember>) -> Vec<String> {
    members.into_iter().map(|member| member.id).collect()
}

#[cfg(test)]
fn expected_ids<P: Fn(&FundingContributor) -> bool>(predicate: P) -> Vec<String> {
    fixture().into_iter().filter(|c| predicate(c)).map(|c| c.id).collect()
}

#[test]
fn contributors_are_core_or_admin() {
    let members = classify(&fixture(), Mode::Contributors, "https://opencollective.com");
    assert_eq!(ids(members), expected_ids(|c| c.is_core || c.is_admin));
}

#[test]
fn backers_are_individual_backers() {
    let members = classify(&fixture(), Mode::Backers, "https://opencollective.com");
    assert_eq!(
        ids(members.clone()),
        expected_ids(|c| c.is_backer && c.account.kind == FundingAccountKind::Individual)
    );
    assert_eq!(members.len(), 4);
    assert!(members.iter().all(|m| m.account_type == AccountType::Individual));
}

#[test]
fn sponsors_are_organization_backers() {
    let members = classify(&fixture(), Mode::Sponsors, "https://opencollective.com");
    assert_eq!(
        ids(members.clone()),
        expected_ids(|c| c.is_backer && c.account.kind == FundingAccountKind::Organization)
    );
    assert_eq!(members.len(), 4);
    assert!(members.iter().all(|m| m.account_type == AccountType::Organization));
}

#[test]
fn all_keeps_everything() {
    let members = classify(&fixture(), Mode::All, "https://opencollective.com");
    assert_eq!(members.len(), 16);
}

#[test]
fn maps_record_fields() {
    let mut record = contributor(3, false, false, true, FundingAccountKind::Collective);
    record.account.image_url = Some("https://images/3.png".to_string());
    let members = classify(&[record], Mode::All, "https://opencollective.com/");
    assert_eq!(
        members,
        vec![DisplayMember {
            id: "c3".to_string(),
            name: "name 3".to_string(),
            image: Some("https://images/3.png".to_string()),
            profile_url: "https://opencollective.com/slug-3".to_string(),
            account_type: AccountType::Individual,
            total_contributed: Some(Amount::new(30.0, Some("USD".to_string()))),
        }]
    );
}

#[test]
fn missing_name_falls_back_to_slug() {
    let mut record = contributor(1, true, false, false, FundingAccountKind::Individual);
    record.account.name = None;
    let members = classify(&[record], Mode::Contributors, "https://opencollective.com");
    assert_eq!(members[0].name, "slug-1");
}
