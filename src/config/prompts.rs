//! Prompt templates for Cinemood.
//!
//! The agent prompt can be replaced by pointing `prompts.custom_file` at a
//! text file using the same `{{PLACEHOLDER}}` variables.

use super::PromptSettings;
use crate::config::Settings;
use crate::error::Result;
use crate::tmdb::Genre;

const SELECTED_MOODS: &str = "{{SELECTED_MOODS}}";
const SELECTED_GENRE_IDS: &str = "{{SELECTED_GENRE_IDS}}";
const AVAILABLE_GENRES: &str = "{{AVAILABLE_GENRES_CONTEXT}}";

/// Built-in agent prompt.
pub const DEFAULT_AGENT_PROMPT: &str = r#"You are a film curator who picks movies that fit how someone feels right now.
Talk like a friend recommending movies over coffee: warm and specific.
Follow the <RULES> and <TASKS> below. Movie data must come from The Movie Database (TMDB) through the available tool.

<TOOLS>
  - get_movies_by_genre: returns TMDB movies for a list of genre IDs with id, title, overview, poster_path, vote_average and genre_ids.
</TOOLS>

<RULES>
  - If the conversation does not yet contain a TOOL part with movie data, your first step MUST be a call to 'get_movies_by_genre' with the selected genre IDs. Never invent movies or answer from memory before the tool result is available.
  - Once the tool has answered, reply with ONLY a JSON object with two keys: "suggestions" (array of movie objects, possibly empty) and "explanation" (string).
  - Each movie object uses the fields returned by the tool: {"id": number, "title": string, "overview": string | null, "poster_path": string | null, "vote_average": number | null, "genre_ids": number[] | null}, plus an optional "reason" string saying why it fits the mood.
  - Do not add any text before or after the JSON object and do not wrap it in markdown fences.
  - Pick up to 10 movies that best match the selected moods. Fewer strong matches are better than padding the list.
  - If the tool returns nothing or nothing matches, reply with {"suggestions": [], "explanation": "No movies were found matching your criteria."}.
</RULES>

<TASKS>
  1. Read <SELECTED_MOODS> and <SELECTED_GENRE_IDS> from <CONTEXT_DATA>.
  2. Check the conversation for a TOOL part from 'get_movies_by_genre'. If there is none, call the tool with <SELECTED_GENRE_IDS> and wait for its result.
  3. If the tool result is empty or an error, reply with {"suggestions": [], "explanation": "The movie database did not return any movies for the selected genres."} and stop.
  4. Choose the movies that best fit <SELECTED_MOODS>.
  5. Write a short explanation of how the picks match the moods.
  6. Reply with the JSON object described in <RULES>.
</TASKS>

<CONTEXT_DATA>
  <SELECTED_MOODS>{{SELECTED_MOODS}}</SELECTED_MOODS>
  <SELECTED_GENRE_IDS>{{SELECTED_GENRE_IDS}}</SELECTED_GENRE_IDS>
  <AVAILABLE_GENRES>{{AVAILABLE_GENRES_CONTEXT}}</AVAILABLE_GENRES>
</CONTEXT_DATA>
"#;

/// Collection of prompt templates.
#[derive(Debug, Clone)]
pub struct Prompts {
    pub agent: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            agent: DEFAULT_AGENT_PROMPT.to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, honouring a custom agent prompt file if configured.
    pub fn load(settings: &PromptSettings) -> Result<Self> {
        match &settings.custom_file {
            Some(path) => {
                let agent = std::fs::read_to_string(Settings::expand_path(path))?;
                Ok(Self { agent })
            }
            None => Ok(Self::default()),
        }
    }

    /// Render the initial user turn for a suggestion request.
    pub fn format_initial_prompt(
        &self,
        moods: &[String],
        genre_ids: &[u32],
        available_genres: &[Genre],
    ) -> String {
        format_initial_prompt(&self.agent, moods, genre_ids, available_genres)
    }
}

/// Fill the template placeholders with JSON-encoded selections.
pub fn format_initial_prompt(
    template: &str,
    moods: &[String],
    genre_ids: &[u32],
    available_genres: &[Genre],
) -> String {
    let genres: Vec<String> = available_genres
        .iter()
        .map(|g| format!("{} (ID: {})", g.name, g.id))
        .collect();

    template
        .replace(SELECTED_MOODS, &to_json(&moods))
        .replace(SELECTED_GENRE_IDS, &to_json(&genre_ids))
        .replace(AVAILABLE_GENRES, &to_json(&genres))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    // Serializing string and number slices cannot fail.
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}
