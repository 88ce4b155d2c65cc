// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompts for the reasoning service.

use std::fmt::Write;

use leadbot_core::{BotPersona, Service};

/// Builds the persona system prompt sent with every free-form query.
///
/// Carries the persona identity and tone, the emoji policy, the catalog,
/// and the rules the reply handling relies on: stay on topic, never echo the
/// greeting, and emit `[[IMAGE: <english phrase>]]` only on explicit request.
pub fn build_system_prompt(persona: &BotPersona, services: &[Service]) -> String {
    let BotPersona {
        name,
        tone,
        topic,
        greeting,
        use_emojis,
    } = persona;

    let mut prompt = format!(
        "Eres {name}, especialista en {topic}.\n\
         Tu tono es {tone}: {directive}\n\n",
        directive = tone.directive(),
    );

    prompt.push_str("Servicios disponibles:\n");
    if services.is_empty() {
        prompt.push_str("- (por ahora no hay servicios publicados)\n");
    } else {
        for service in services {
            let _ = writeln!(prompt, "- {}", service.name);
        }
    }

    let _ = write!(
        prompt,
        "\nReglas:\n\
         1. Responde solo sobre {topic}. Rechaza con amabilidad cualquier otra tarea \
         (matemáticas, código, consejos médicos, política). Si el mensaje mezcla {topic} \
         con otra tarea, responde solo la parte de {topic} y explica que como {name} no \
         puedes ayudar con lo demás.\n\
         2. Imágenes: solo si el usuario pide ver algo (\"ver\", \"foto\", \"imagen\"), \
         termina tu respuesta con la etiqueta [[IMAGE: frase de búsqueda en inglés]], \
         por ejemplo [[IMAGE: poodle after grooming]]. Nunca uses la etiqueta en otro caso \
         y nunca la menciones en el texto.\n\
         3. No repitas el saludo \"{greeting}\" en tus respuestas.\n\
         4. No bromees sobre tragedias ni muertes.\n\
         5. Si el usuario quiere reservar, invítalo a usar el botón de solicitud; \
         no tomes datos personales en el chat.\n\n{emojis}",
        emojis = if *use_emojis {
            "Incluye siempre emojis relevantes."
        } else {
            "No uses emojis."
        },
    );

    prompt
}

/// Labels the classifier may answer with.
pub const CLASSIFIER_LABELS: &[&str] = &["SALUDO", "CITA", "IMAGEN", "CONSULTA"];

/// System prompt for the optional one-word intent classification call.
pub fn classifier_prompt(topic: &str) -> String {
    format!(
        "Clasifica el mensaje de un cliente de un negocio de {topic}. \
         Responde únicamente con una de estas etiquetas: {}. \
         SALUDO: saludo o conversación social. CITA: quiere reservar o pregunta precios o servicios. \
         IMAGEN: quiere ver una foto. CONSULTA: cualquier otra pregunta.",
        CLASSIFIER_LABELS.join(", ")
    )
}
