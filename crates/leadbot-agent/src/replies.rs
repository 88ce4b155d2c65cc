// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply texts.

use chrono::NaiveDate;
use leadbot_core::{BotPersona, Service};

use crate::validation::{PersistenceConflict, ValidationError};

pub const ERROR_APOLOGY: &str = "❌ Disculpa, hubo un error procesando tu mensaje.";
pub const PROVIDER_FALLBACK: &str =
    "Disculpa, ahora mismo no puedo responder. Inténtalo de nuevo en unos minutos.";
pub const NO_IMAGE: &str = "No encontré una foto de eso.";
pub const NO_SERVICES: &str = "Por ahora no tenemos servicios disponibles para solicitar.";
pub const CANCELLED: &str = "Solicitud cancelada. Si necesitas algo más, aquí estoy.";
pub const NOTHING_TO_CANCEL: &str = "No tienes ninguna solicitud en curso.";
pub const SESSION_CONFLICT: &str =
    "Recibí varios mensajes a la vez. ¿Puedes reenviar tu último mensaje?";
pub const UNKNOWN_ACTION: &str = "Esa opción ya no está disponible.";
pub const FLOW_RESTART: &str =
    "Perdí el hilo de tu solicitud. Escribe /solicitar para empezar de nuevo.";
pub const DATE_UNRESOLVED: &str =
    "No entendí la fecha. Escríbela en formato DD/MM/AAAA, por ejemplo 15/07/2025.";

pub const ASK_NAME: &str = "¡Perfecto! Para tu solicitud, ¿cuál es tu nombre completo?";

pub fn ask_phone(name: &str) -> String {
    format!("Gracias, {name}. ¿A qué número de teléfono podemos contactarte?")
}

pub fn ask_service(services: &[Service]) -> String {
    format!(
        "¿Qué servicio te interesa? Escribe el nombre tal como aparece:\n{}",
        service_list(services)
    )
}

pub fn ask_date(service: &Service) -> String {
    format!(
        "Anotado: {}. ¿Para qué fecha lo quieres? Puedes escribir \"mañana\", \
         \"el próximo lunes\" o una fecha como 15/07/2025.",
        service.name
    )
}

pub fn confirmation(name: &str, phone: &str, service: &str, date: NaiveDate) -> String {
    format!(
        "✅ ¡Listo, {name}! Registramos tu solicitud de {service} para el {}. \
         Te contactaremos al {phone}.",
        date.format("%d/%m/%Y")
    )
}

/// Persona greeting followed by the catalog.
pub fn greeting(persona: &BotPersona, services: &[Service]) -> String {
    if services.is_empty() {
        return persona.greeting.clone();
    }
    format!(
        "{}\n\nEstos son nuestros servicios:\n{}",
        persona.greeting,
        service_list(services)
    )
}

pub fn service_list(services: &[Service]) -> String {
    services
        .iter()
        .map(|s| format!("• {}", s.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Corrective prompt for a rejected field. The service list is repeated
/// when the selection missed.
pub fn invalid_field(error: ValidationError, services: &[Service]) -> String {
    match error {
        ValidationError::NameTooShort => {
            "El nombre debe tener al menos 3 caracteres. ¿Cuál es tu nombre completo?".to_string()
        }
        ValidationError::PhoneBadFormat => {
            "Ese teléfono no parece válido. Escribe de 7 a 15 dígitos, con + opcional al inicio."
                .to_string()
        }
        ValidationError::ServiceNotFound => format!(
            "No encontré ese servicio. Elige uno de la lista:\n{}",
            service_list(services)
        ),
        ValidationError::DateInPast => {
            "Esa fecha ya pasó. Indica una fecha a partir de hoy.".to_string()
        }
        ValidationError::DateTooFarAhead => {
            "Solo agendamos hasta el próximo año. Indica una fecha más cercana.".to_string()
        }
    }
}

pub fn conflict(conflict: PersistenceConflict) -> String {
    match conflict {
        PersistenceConflict::PhoneOwnership => {
            "Ese teléfono ya está registrado a otro nombre. Indica otro número.".to_string()
        }
        PersistenceConflict::DuplicateBooking => {
            "Ya tienes una solicitud igual para esa fecha. Elige otra fecha.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_uses_day_month_year() {
        let text = confirmation(
            "Juan Perez",
            "+5212345678",
            "Grooming",
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        );
        assert!(text.contains("02/06/2025"));
        assert!(text.contains("Juan Perez"));
        assert!(text.contains("Grooming"));
    }

    #[test]
    fn greeting_lists_services_when_present() {
        let persona = BotPersona::default();
        let services = vec![Service {
            id: 1,
            name: "Grooming".into(),
        }];
        let text = greeting(&persona, &services);
        assert!(text.starts_with(&persona.greeting));
        assert!(text.contains("• Grooming"));
        assert_eq!(greeting(&persona, &[]), persona.greeting);
    }
}
