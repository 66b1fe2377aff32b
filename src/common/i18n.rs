// src/common/i18n.rs

use crate::middleware::i18n::Locale;

// Mensagens que chegam ao usuário. Português é o padrão; inglês quando pedido.
pub fn message(locale: &Locale, key: &str) -> &'static str {
    let english = locale.0 == "en";

    match (key, english) {
        ("validation", false) => "Um ou mais campos são inválidos.",
        ("validation", true) => "One or more fields are invalid.",

        ("not_authenticated", false) => "Sessão expirada ou inexistente. Faça login novamente.",
        ("not_authenticated", true) => "Session expired or missing. Please log in again.",

        ("not_found", false) => "Registro não encontrado.",
        ("not_found", true) => "Record not found.",

        ("mutation_in_progress", false) => "Já existe uma operação em andamento. Aguarde.",
        ("mutation_in_progress", true) => "Another operation is already running. Please wait.",

        ("partially_applied", false) => {
            "A operação foi aplicada só em parte. Confira o cadastro antes de tentar de novo."
        }
        ("partially_applied", true) => {
            "The operation was only partially applied. Check the record before retrying."
        }

        ("transport", false) => "Erro de conexão com o servidor. Tente novamente.",
        ("transport", true) => "Could not reach the server. Please try again.",

        ("server", false) => "Erro interno do servidor. Tente novamente mais tarde.",
        ("server", true) => "Internal server error. Please try again later.",

        (_, false) => "Ocorreu um erro inesperado.",
        (_, true) => "An unexpected error occurred.",
    }
}
