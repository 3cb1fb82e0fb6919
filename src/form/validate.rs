//! Client-side validation, evaluated in fixed order and short-circuiting on
//! the first failure. Intentionally stricter than the server, which only
//! requires name, email, and project type.

use super::state::DevisFormData;

/// First failing rule as a user-facing message, or `Ok` when submittable.
pub fn validate(data: &DevisFormData) -> Result<(), String> {
    if data.client_name.trim().is_empty() {
        return Err("Le nom est requis".to_string());
    }

    if data.client_email.trim().is_empty() {
        return Err("L'email est requis".to_string());
    }

    if !is_valid_email(data.client_email.trim()) {
        return Err("Format d'email invalide".to_string());
    }

    if data.project_type.is_empty() {
        return Err("Le type de projet est requis".to_string());
    }

    if parsed_surface(&data.surface) < 0.0 {
        return Err("La surface doit être positive".to_string());
    }

    if data.description.trim().is_empty() {
        return Err("La description du projet est requise".to_string());
    }

    Ok(())
}

/// local-part@domain.tld with no whitespace, one `@`, and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(|c| c.is_whitespace()) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// The surface field is free text; anything non-numeric counts as 0.
pub fn parsed_surface(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_data() -> DevisFormData {
        let mut data = DevisFormData::blank();
        data.client_name = "Jane Doe".to_string();
        data.client_email = "jane@x.com".to_string();
        data.project_type = "renovation".to_string();
        data.surface = "50".to_string();
        data.description = "Kitchen remodel".to_string();
        data
    }

    #[test]
    fn accepts_a_complete_form() {
        assert!(validate(&valid_data()).is_ok());
    }

    #[test]
    fn rules_fire_in_fixed_order() {
        let mut data = valid_data();
        data.client_name = "  ".to_string();
        data.client_email = String::new();
        // Name is checked before email
        assert_eq!(validate(&data).unwrap_err(), "Le nom est requis");

        data.client_name = "Jane Doe".to_string();
        assert_eq!(validate(&data).unwrap_err(), "L'email est requis");

        data.client_email = "not-an-email".to_string();
        assert_eq!(validate(&data).unwrap_err(), "Format d'email invalide");

        data.client_email = "jane@x.com".to_string();
        data.project_type = String::new();
        assert_eq!(validate(&data).unwrap_err(), "Le type de projet est requis");

        data.project_type = "renovation".to_string();
        data.surface = "-5".to_string();
        assert_eq!(validate(&data).unwrap_err(), "La surface doit être positive");

        data.surface = "50".to_string();
        data.description = String::new();
        assert_eq!(
            validate(&data).unwrap_err(),
            "La description du projet est requise"
        );
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email("jean.dupont@mail.example.fr"));

        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("jane@xcom"));
        assert!(!is_valid_email("jane@.com"));
        assert!(!is_valid_email("jane@x."));
        assert!(!is_valid_email("jane doe@x.com"));
        assert!(!is_valid_email("jane@x@y.com"));
    }

    #[test]
    fn non_numeric_surface_counts_as_zero() {
        assert_eq!(parsed_surface("50"), 50.0);
        assert_eq!(parsed_surface(" 12.5 "), 12.5);
        assert_eq!(parsed_surface("abc"), 0.0);
        assert_eq!(parsed_surface(""), 0.0);
    }
}
