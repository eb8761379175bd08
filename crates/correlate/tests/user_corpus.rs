use dump_correlate::{correlate, is_degenerate, top_correlations};
use dump_protocol::{ProfileField, User, BIO_FIELD, GENDER_FEMALE, GENDER_MALE};

fn user(id: &str, gender: i32, bio: Option<&str>) -> User {
    let profile_fields = bio
        .map(|text| {
            vec![ProfileField {
                id: BIO_FIELD.to_string(),
                display_value: text.to_string(),
                ..Default::default()
            }]
        })
        .unwrap_or_default();
    User {
        id: id.to_string(),
        gender,
        profile_fields,
        ..Default::default()
    }
}

#[test]
fn gender_correlations_over_users() {
    let users = vec![
        user("1", GENDER_MALE, Some("Gym, beer and football.")),
        user("2", GENDER_MALE, Some("football/gym rat")),
        user("3", GENDER_FEMALE, Some("Yoga and wine")),
        user("4", GENDER_FEMALE, Some("wine, yoga, dogs")),
        user("5", GENDER_FEMALE, None),
    ];

    let table = correlate(
        users.into_iter().map(Ok::<_, std::io::Error>),
        |u: &User| u.gender == GENDER_MALE,
    )
    .expect("in-memory corpus cannot fail");

    assert!((table["football"] - 1.0).abs() < 1e-9);
    assert!((table["gym"] - 1.0).abs() < 1e-9);
    assert!(table["wine"] < 0.0);
    assert!(!table.contains_key("Gym"));
    assert!(table.values().all(|v| !is_degenerate(*v)));

    let top = top_correlations(&table, 2, &[]);
    let words: Vec<&str> = top.iter().map(|(w, _)| w.as_str()).collect();
    assert_eq!(words, vec!["football", "gym"]);
}

#[test]
fn cursor_error_is_surfaced() {
    let items = vec![
        Ok(user("1", GENDER_MALE, Some("hello"))),
        Err(std::io::Error::new(std::io::ErrorKind::Other, "connection reset")),
    ];
    let err = correlate(items, |u: &User| u.gender == GENDER_MALE).unwrap_err();
    assert_eq!(err.to_string(), "connection reset");
}
