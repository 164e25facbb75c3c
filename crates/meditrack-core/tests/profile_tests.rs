//! User profile storage integration tests.

use chrono::{TimeZone, Utc};
use meditrack_core::db::MediTrackDatabase;
use meditrack_core::models::UserProfile;
use meditrack_core::repository::UserProfileRepository;

fn make_profile(first: &str, last: &str) -> UserProfile {
    let dob = Utc.with_ymd_and_hms(1985, 6, 15, 0, 0, 0).unwrap();
    UserProfile::new(first.to_string(), last.to_string(), dob, "female".to_string())
}

#[test]
fn test_single_main_profile() {
    let repo = UserProfileRepository::new(MediTrackDatabase::open_in_memory().unwrap());

    let mut jane = make_profile("Jane", "Doe");
    jane.is_main_profile = true;
    let jane_id = repo.insert_user_profile(&jane).unwrap();

    let mut mark = make_profile("Mark", "Doe");
    mark.is_main_profile = true;
    let mark_id = repo.insert_user_profile(&mark).unwrap();

    let main = repo.get_main_user_profile().unwrap().unwrap();
    assert_eq!(main.id, mark_id);
    assert!(!repo.get_user_profile_by_id(jane_id).unwrap().unwrap().is_main_profile);

    assert!(repo.set_main_user_profile(jane_id).unwrap());
    let mains: Vec<i64> = repo
        .list_user_profiles()
        .unwrap()
        .into_iter()
        .filter(|p| p.is_main_profile)
        .map(|p| p.id)
        .collect();
    assert_eq!(mains, vec![jane_id]);
}

#[test]
fn test_search_matches_first_or_last_name() {
    let repo = UserProfileRepository::new(MediTrackDatabase::open_in_memory().unwrap());
    repo.insert_user_profile(&make_profile("Jane", "Doe")).unwrap();
    repo.insert_user_profile(&make_profile("Ann", "Smith")).unwrap();
    repo.insert_user_profile(&make_profile("Bob", "Marley")).unwrap();

    let names: Vec<String> = repo
        .find_user_profiles("an")
        .unwrap()
        .into_iter()
        .map(|p| p.first_name)
        .collect();
    assert_eq!(names, vec!["Ann", "Jane"]);

    assert_eq!(repo.find_user_profiles("Marl").unwrap().len(), 1);
    assert!(repo.find_user_profiles("zzz").unwrap().is_empty());
}

#[test]
fn test_profiles_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meditrack_database");

    let mut profile = make_profile("Jane", "Doe");
    profile.height = Some(168.5);
    profile.emergency_contact_name = Some("Mark Doe".to_string());
    profile.emergency_contact_phone = Some("555-0100".to_string());
    profile.is_main_profile = true;

    {
        let repo = UserProfileRepository::new(MediTrackDatabase::open(&path).unwrap());
        profile.id = repo.insert_user_profile(&profile).unwrap();
    }

    let repo = UserProfileRepository::new(MediTrackDatabase::open(&path).unwrap());
    assert_eq!(repo.get_main_user_profile().unwrap(), Some(profile));
}

#[test]
fn test_live_profiles_follow_mutations() {
    let repo = UserProfileRepository::new(MediTrackDatabase::open_in_memory().unwrap());
    let mut live = repo.get_all_user_profiles();
    assert!(live.next().unwrap().unwrap().is_empty());

    let mut profile = make_profile("Jane", "Doe");
    profile.id = repo.insert_user_profile(&profile).unwrap();
    assert_eq!(live.next().unwrap().unwrap().len(), 1);

    profile.first_name = "Janet".to_string();
    repo.update_user_profile(&profile).unwrap();
    assert_eq!(live.next().unwrap().unwrap()[0].first_name, "Janet");

    repo.delete_user_profile(&profile).unwrap();
    assert!(live.next().unwrap().unwrap().is_empty());
}
