// ============================================================================
// Nettoyage de la description HTML
// ============================================================================
// L'API renvoie une description avec du balisage HTML (<p>, <a>, <h3>...).
// Un terminal n'interprète pas le HTML : on le convertit en lignes de texte
// avant de l'afficher, sans jamais exécuter ni recopier de balise.
//
// - balises de bloc (p, br, div, h1-h6, li...) : retour à la ligne
// - <li> : puce "• "
// - <script> et <style> : contenu supprimé
// - entités (&amp;, &#39;, &#x27;...) : décodées
// ============================================================================

/// Balises qui provoquent un retour à la ligne
const BLOCK_TAGS: [&str; 15] = [
    "p", "br", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "tr", "blockquote", "hr",
];

/// Balises dont le contenu est supprimé
const DROPPED_TAGS: [&str; 2] = ["script", "style"];

/// Convertit une description HTML en lignes de texte affichables
///
/// Fonction totale : None ou texte vide donnent un Vec vide.
pub fn sanitize_description(html: Option<&str>) -> Vec<String> {
    let html = match html {
        Some(html) => html,
        None => return Vec::new(),
    };

    let text = strip_tags(html);
    let decoded = decode_entities(&text);

    decoded
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty() && line != "•")
        .collect()
}

// ============================================================================
// Suppression des balises
// ============================================================================
// CONCEPT RUST : Parcours par indices d'octets
// - find() renvoie des positions en octets
// - Les délimiteurs '<' et '>' sont ASCII, donc les slices restent valides en UTF-8
// ============================================================================

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    // Balise dont on saute le contenu (script/style)
    let mut skipping: Option<&'static str> = None;

    while let Some(start) = rest.find('<') {
        let (before, tail) = rest.split_at(start);
        if skipping.is_none() {
            out.push_str(before);
        }

        let end = match tail.find('>') {
            Some(end) => end,
            None => {
                // '<' sans fermeture : texte littéral
                if skipping.is_none() {
                    out.push_str(tail);
                }
                return out;
            }
        };

        let (name, closing) = tag_name(&tail[1..end]);

        match skipping {
            Some(dropped) => {
                if closing && name == dropped {
                    skipping = None;
                }
            }
            None => {
                if let Some(dropped) = DROPPED_TAGS.iter().find(|t| **t == name) {
                    if !closing {
                        skipping = Some(*dropped);
                    }
                } else if BLOCK_TAGS.contains(&name.as_str()) {
                    out.push('\n');
                    if name == "li" && !closing {
                        out.push_str("• ");
                    }
                }
            }
        }

        rest = &tail[end + 1..];
    }

    if skipping.is_none() {
        out.push_str(rest);
    }
    out
}

/// Extrait le nom d'une balise ("/P class=x" -> ("p", true))
fn tag_name(inner: &str) -> (String, bool) {
    let inner = inner.trim();
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(stripped) => (true, stripped),
        None => (false, inner),
    };
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    (name, closing)
}

// ============================================================================
// Décodage des entités HTML
// ============================================================================

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        // Une entité fait au plus une dizaine de caractères
        let decoded = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
