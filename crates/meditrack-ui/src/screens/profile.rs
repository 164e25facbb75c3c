//! Profile screen: the main profile, or a prompt to create one.

use meditrack_core::models::UserProfile;

use crate::intent::Intent;
use crate::text::{capitalize_first_letter, format_date, mask_sensitive_data};
use crate::view::{Node, View};
use crate::viewmodel::ProfileUiState;

pub const NO_PROFILE: &str = "No profile set up yet";
pub const NO_PROFILE_HINT: &str = "Create your profile to track your medical records";

/// Digits of a phone number left readable.
const PHONE_VISIBLE_DIGITS: usize = 4;

fn field(label: &str, value: impl AsRef<str>, tag: &str) -> Node {
    Node::text(format!("{label}: {}", value.as_ref())).tagged(tag)
}

fn profile_details(profile: &UserProfile) -> Vec<Node> {
    let mut nodes = vec![
        Node::subtitle(profile.full_name()).tagged("profile_name"),
        field("Date of birth", format_date(&profile.date_of_birth), "profile_dob"),
        field("Gender", capitalize_first_letter(&profile.gender), "profile_gender"),
    ];

    if let Some(blood_type) = &profile.blood_type {
        nodes.push(field("Blood type", blood_type, "profile_blood_type"));
    }
    if let Some(height) = profile.height {
        nodes.push(field("Height", format!("{height} cm"), "profile_height"));
    }
    if let Some(weight) = profile.weight {
        nodes.push(field("Weight", format!("{weight} kg"), "profile_weight"));
    }
    if let Some(phone) = &profile.phone {
        nodes.push(field(
            "Phone",
            mask_sensitive_data(phone, PHONE_VISIBLE_DIGITS),
            "profile_phone",
        ));
    }
    if let Some(email) = &profile.email {
        nodes.push(field("Email", email, "profile_email"));
    }
    if let Some(address) = &profile.address {
        nodes.push(field("Address", address, "profile_address"));
    }
    if let Some(name) = &profile.emergency_contact_name {
        let mut contact = name.clone();
        if let Some(relation) = &profile.emergency_contact_relation {
            contact.push_str(&format!(" ({relation})"));
        }
        if let Some(phone) = &profile.emergency_contact_phone {
            contact.push_str(&format!(", {phone}"));
        }
        nodes.push(field("Emergency contact", contact, "profile_emergency_contact"));
    }
    if let Some(allergies) = &profile.allergies {
        nodes.push(field("Allergies", allergies, "profile_allergies"));
    }
    if let Some(conditions) = &profile.chronic_conditions {
        nodes.push(field("Chronic conditions", conditions, "profile_conditions"));
    }
    if let Some(notes) = &profile.notes {
        nodes.push(field("Notes", notes, "profile_notes"));
    }

    nodes.push(Node::button("Edit Profile", Intent::EditProfile(profile.id)).tagged("edit_profile_button"));
    nodes
}

pub fn render(state: &ProfileUiState) -> View {
    let mut children = vec![Node::heading("Profile"), Node::icon("Profile")];

    if let Some(error) = &state.error {
        children.push(Node::text(error.clone()).tagged("error_message"));
    }

    match &state.profile {
        Some(profile) => children.extend(profile_details(profile)),
        None if state.is_loading => children.push(Node::text("Loading...").tagged("loading")),
        None => {
            children.push(Node::subtitle(NO_PROFILE));
            children.push(Node::text(NO_PROFILE_HINT));
            children.push(
                Node::button("Create My Profile", Intent::CreateProfile)
                    .tagged("create_profile_button"),
            );
        }
    }

    children.push(
        Node::button("Add Family Member", Intent::AddFamilyMember).tagged("add_family_member_button"),
    );

    View::new(Node::column(children))
}
