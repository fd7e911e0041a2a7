//! Prompt construction for the generative model.
//!
//! Pure string templating, no I/O. Two variants exist: the multi-persona
//! critique prompt and the single-outfit restyle prompt. Each comes in a
//! search-augmented and an internal-knowledge-only flavor so the
//! orchestrator's fallback path can drop the external-search instruction.

use crate::locale::Language;
use crate::persona::Persona;

/// Whether the prompt invites the model to ground itself in live search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Primary attempt: allow web-search grounding for current trends.
    Augmented,
    /// Fallback attempt: general knowledge only, no external search.
    InternalOnly,
}

/// Region hint appended to the context block. Spanish targets get local
/// slang permission; everything else is global.
fn region_hint(lang: Language) -> &'static str {
    match lang {
        Language::Es => {
            "Uruguay/Argentina (use local slang like \"che\", \"re\", \"copado\" \
             if appropriate for the persona)"
        }
        Language::En => "Global",
    }
}

fn knowledge_instruction(search: SearchMode) -> &'static str {
    match search {
        SearchMode::Augmented => {
            "Use current web trend knowledge to ground your analysis in what is \
             actually being worn this season."
        }
        SearchMode::InternalOnly => {
            "Use general/internal knowledge only. Do not rely on external search."
        }
    }
}

/// Build the multi-persona critique prompt.
///
/// Encodes the three personas, the occasion, the target language, the
/// region hint, the 0-1000 coordinate convention for highlights, and a
/// strict JSON schema the normalizer knows how to repair when the model
/// deviates from it.
pub fn critique_prompt(occasion: &str, lang: Language, search: SearchMode) -> String {
    let mut personas = String::new();
    for persona in Persona::ALL {
        personas.push_str(&format!(
            "### {id}\n{instruction}\n\n",
            id = persona.id(),
            instruction = persona.instruction(),
        ));
    }

    format!(
        "**Role:**\n\
         You are an expert Personal Stylist AI.\n\
         Current Year: 2026.\n\
         Trend Knowledge: High (Aware of Gorpcore, Y2K, Old Money, etc).\n\
         {knowledge}\n\
         \n\
         **The Personas You Must Act As (all three, once each):**\n\
         {personas}\
         **The Context:**\n\
         - Occasion: {occasion}\n\
         - Target Language: {lang}\n\
         - Region: {region}\n\
         \n\
         **Task:**\n\
         Analyze the attached image of the outfit as each persona in turn.\n\
         1. Identify the key items and their placement.\n\
         2. Evaluate based on each Persona's specific priorities.\n\
         3. Provide a numeric score (1-10) per persona.\n\
         4. Identify 3-5 specific \"highlights\" (points of interest) per persona. \
         Each highlight must be either \"good\" or \"bad\".\n\
         5. For each highlight, provide coordinates scaled 0-1000: either a bounding \
         box \"box_2d\": [ymin, xmin, ymax, xmax] around the item, or a center point \
         \"point_2d\": [y, x] on it. Use integers on the 0-1000 grid, never 0-1 \
         fractions.\n\
         \n\
         **Response Format:**\n\
         Return raw JSON only. Do not use Markdown code blocks.\n\
         {{\n\
         \x20 \"results\": [\n\
         \x20   {{\n\
         \x20     \"persona\": \"editor\" | \"hypebeast\" | \"boho\",\n\
         \x20     \"score\": number,\n\
         \x20     \"title\": \"Short punchy title (max 6 words)\",\n\
         \x20     \"critique\": \"2-3 sentences analyzing the fit, color, and vibe.\",\n\
         \x20     \"improvement_tip\": \"One concrete, actionable step to fix the outfit.\",\n\
         \x20     \"highlights\": [\n\
         \x20       {{\n\
         \x20         \"type\": \"good\" | \"bad\",\n\
         \x20         \"label\": \"Short description (e.g. 'Perfect tailoring', 'Clashing colors')\",\n\
         \x20         \"box_2d\": [ymin, xmin, ymax, xmax]\n\
         \x20       }}\n\
         \x20     ]\n\
         \x20   }}\n\
         \x20 ]\n\
         }}\n\
         The \"results\" array must contain exactly three entries, one per persona.\n",
        knowledge = knowledge_instruction(search),
        personas = personas,
        occasion = occasion,
        lang = lang.as_upper(),
        region = region_hint(lang),
    )
}

/// Build the restyle ("style me") prompt.
pub fn restyle_prompt(user_request: &str, lang: Language, search: SearchMode) -> String {
    format!(
        "**Role:**\n\
         You are an expert Personal Stylist AI restyling the person in the attached photo.\n\
         {knowledge}\n\
         \n\
         **The Request:**\n\
         Style Me: {user_request}\n\
         \n\
         **The Context:**\n\
         - Target Language: {lang}\n\
         - Region: {region}\n\
         \n\
         **Response Format:**\n\
         Return raw JSON only. Do not use Markdown code blocks.\n\
         {{\n\
         \x20 \"user_analysis\": \"What you see in the photo (body shape, coloring, current style).\",\n\
         \x20 \"outfit_name\": \"Catchy name for the proposed outfit\",\n\
         \x20 \"items\": [\"each clothing item of the proposed outfit\"],\n\
         \x20 \"reasoning\": \"Why this outfit works for this person and request.\",\n\
         \x20 \"dos\": [\"styling tips to follow\"],\n\
         \x20 \"donts\": [\"styling mistakes to avoid\"],\n\
         \x20 \"visual_prompt\": \"Photorealistic fashion-shot description of the outfit, in English.\"\n\
         }}\n",
        knowledge = knowledge_instruction(search),
        user_request = user_request,
        lang = lang.as_upper(),
        region = region_hint(lang),
    )
}
