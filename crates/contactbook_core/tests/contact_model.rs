use contactbook_core::{Contact, FieldError, NewContact};

#[test]
fn contact_serializes_with_camel_case_fields() {
    let contact = Contact::from_new(3, NewContact::new("Ann", "12345", "ann@x.com", "friend"));

    let value = serde_json::to_value(&contact).unwrap();
    assert_eq!(value["id"], 3);
    assert_eq!(value["mobileNumber"], "12345");
    assert_eq!(value["emailAddress"], "ann@x.com");
    assert_eq!(value["description"], "friend");
}

#[test]
fn new_contact_description_defaults_to_empty() {
    let contact: NewContact = serde_json::from_str(
        r#"{"name":"Ann","mobileNumber":"12345","emailAddress":"ann@x.com"}"#,
    )
    .unwrap();

    assert_eq!(contact.description, "");
    assert!(contact.validate().is_ok());
}

#[test]
fn new_contact_validate_reports_each_field() {
    let contact = NewContact::new("", "", "", "");

    let errors = contact.validate().unwrap_err();
    assert_eq!(errors.name, Some(FieldError::NameRequired));
    assert_eq!(errors.mobile_number, Some(FieldError::MobileRequired));
    assert_eq!(errors.email_address, Some(FieldError::EmailRequired));
}

#[test]
fn visible_description_skips_blank_text() {
    let mut contact = Contact::from_new(1, NewContact::new("Ann", "1", "a@b.com", " "));
    assert_eq!(contact.visible_description(), None);

    contact.description = "met at work".to_string();
    assert_eq!(contact.visible_description(), Some("met at work"));
}
