mod config;
mod quiz;
mod storage;

use std::sync::Arc;

use config::Config;
use dotenv::dotenv;
use quiz::{words::load_words, MistakeViewer, OptionSet, Outcome, QuizEngine, QuizError, QuizState, WordList};
use storage::FileStore;
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup},
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Which screen a chat is on. `PuzzleGame` keeps the options on display so a
/// reply is checked against what the user actually saw.
#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    PuzzleGame {
        index: usize,
        options: Vec<String>,
    },
    IncorrectAnswers {
        index: usize,
    },
    Completed,
}

type DialogueStorage = std::sync::Arc<ErasedStorage<State>>;

#[tokio::main]
async fn main() {
    let dotenv_loaded = dotenv().is_ok();

    pretty_env_logger::init();
    if !dotenv_loaded {
        log::debug!("No .env file, using the process environment");
    }
    log::info!("Starting vocabulary quiz bot...");

    let config = Config::from_env();
    let bot = Bot::from_env();

    log::info!("Opening dialogue storage at {}", config.dialogue_db);
    let storage: DialogueStorage = match SqliteStorage::open(&config.dialogue_db, Json).await {
        Ok(storage) => storage.erase(),
        Err(e) => {
            log::error!("Failed to open dialogue storage: {}", e);
            return;
        }
    };

    // A missing word file is not fatal, the bot just has nothing to ask
    let words = match load_words(&config.words_path) {
        Ok(words) => {
            log::info!("Loaded {} words from {}", words.len(), config.words_path.display());
            words
        }
        Err(e) => {
            log::error!("Error loading words: {}", e);
            WordList::default()
        }
    };
    if words.is_empty() {
        log::warn!("The word list is empty, every chat will be told there is nothing to ask");
    }
    let words = Arc::new(words);
    let store = FileStore::new(config.store_dir.clone());

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::PuzzleGame { index, options }].endpoint(puzzle_game))
            .branch(dptree::case![State::IncorrectAnswers { index }].endpoint(incorrect_answers))
            .branch(dptree::case![State::Completed].endpoint(completed)),
    )
    .dependencies(dptree::deps![storage, words, store])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str = "Learn German Words! Pick the Arabic translation of every German word.";
const NO_WORDS_TEXT: &str = "No words available right now.";
const PICK_OPTION_TEXT: &str = "Please pick one of the options.";
const CORRECT_TEXT: &str = "Correct!";
const INCORRECT_TEXT: &str = "Incorrect. Try again!";
const NOT_SAVED_TEXT: &str = "Incorrect. Try again! (Your answer could not be saved.)";
const COMPLETED_TEXT: &str = "Congratulations! You have completed all the words!";

const VIEW_INCORRECT_ANSWERS: &str = "View Incorrect Answers";
const BACK_TO_QUIZ: &str = "Back to quiz";
const RESTART: &str = "Restart";

async fn start(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    words: Arc<WordList>,
    store: FileStore,
) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;

    let engine = QuizEngine::start(words, store.scoped(msg.chat.id.0)).await;
    show_question(&bot, &dialogue, &engine).await
}

async fn puzzle_game(
    bot: Bot,
    dialogue: QuizDialogue,
    (index, options): (usize, Vec<String>),
    msg: Message,
    words: Arc<WordList>,
    store: FileStore,
) -> HandlerResult {
    let store = store.scoped(msg.chat.id.0);

    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, PICK_OPTION_TEXT).await?;
        return Ok(());
    };

    if text == VIEW_INCORRECT_ANSWERS {
        return show_incorrect_answers(&bot, &dialogue, &store, index).await;
    }

    let mut engine = QuizEngine::resume(
        words,
        store,
        QuizState::AtQuestion(index),
        Some(OptionSet::from(options)),
    )
    .await;

    match read_reply(text, engine.options()) {
        Reply::Answer => {}
        Reply::Seek(target) => {
            return match engine.seek(target) {
                Ok(_) => show_question(&bot, &dialogue, &engine).await,
                Err(QuizError::NoWords) => {
                    bot.send_message(msg.chat.id, NO_WORDS_TEXT).await?;
                    Ok(())
                }
                Err(e) => Err(e.into()),
            };
        }
        Reply::Unknown => {
            bot.send_message(msg.chat.id, PICK_OPTION_TEXT)
                .reply_markup(question_keyboard(engine.options()))
                .await?;
            return Ok(());
        }
    }

    match engine.submit_answer(text).await {
        Ok(Outcome::Correct { next }) => {
            log::debug!("Chat {} moves on to question {}", msg.chat.id.0, next);
            bot.send_message(msg.chat.id, CORRECT_TEXT).await?;
            show_question(&bot, &dialogue, &engine).await
        }
        Ok(Outcome::Completed) => {
            bot.send_message(msg.chat.id, COMPLETED_TEXT)
                .reply_markup(KeyboardMarkup::new(vec![vec![KeyboardButton::new(RESTART)]]))
                .await?;
            dialogue.update(State::Completed).await?;
            Ok(())
        }
        Ok(Outcome::Incorrect(_)) => {
            log::debug!(
                "Chat {} has {} incorrect answer(s) recorded",
                msg.chat.id.0,
                engine.mistakes().len()
            );
            bot.send_message(msg.chat.id, INCORRECT_TEXT).await?;
            show_question(&bot, &dialogue, &engine).await
        }
        Err(QuizError::Load(e) | QuizError::Persist(e)) => {
            log::error!("Error saving incorrect answer: {}", e);
            bot.send_message(msg.chat.id, NOT_SAVED_TEXT).await?;
            show_question(&bot, &dialogue, &engine).await
        }
        Err(e) => Err(e.into()),
    }
}

async fn incorrect_answers(
    bot: Bot,
    dialogue: QuizDialogue,
    index: usize,
    msg: Message,
    words: Arc<WordList>,
    store: FileStore,
) -> HandlerResult {
    let store = store.scoped(msg.chat.id.0);

    match msg.text() {
        Some(BACK_TO_QUIZ) => {
            let engine = QuizEngine::resume(words, store, QuizState::AtQuestion(index), None).await;
            show_question(&bot, &dialogue, &engine).await
        }
        _ => show_incorrect_answers(&bot, &dialogue, &store, index).await,
    }
}

async fn completed(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    words: Arc<WordList>,
    store: FileStore,
) -> HandlerResult {
    match msg.text() {
        Some(RESTART) => {
            log::info!("Chat {} restarted the quiz", msg.chat.id.0);
            let mut engine =
                QuizEngine::resume(words, store.scoped(msg.chat.id.0), QuizState::Completed, None).await;
            engine.restart();
            show_question(&bot, &dialogue, &engine).await
        }
        _ => {
            bot.send_message(msg.chat.id, COMPLETED_TEXT)
                .reply_markup(KeyboardMarkup::new(vec![vec![KeyboardButton::new(RESTART)]]))
                .await?;
            Ok(())
        }
    }
}

async fn show_question(
    bot: &Bot,
    dialogue: &QuizDialogue,
    engine: &QuizEngine<FileStore>,
) -> HandlerResult {
    let chat_id = dialogue.chat_id();

    let Some(word) = engine.current() else {
        bot.send_message(chat_id, NO_WORDS_TEXT).await?;
        dialogue.update(State::Start).await?;
        return Ok(());
    };
    let index = engine.index();
    log::debug!("Showing {} options for question {}", engine.options().len(), index);

    let question_text = format!(
        "Translate \"{}\" to Arabic:\n\nCurrent Index: {} (0-{})\nSend /seek N to jump to another word.",
        word.german,
        index,
        engine.len() - 1
    );

    bot.send_message(chat_id, question_text)
        .reply_markup(question_keyboard(engine.options()))
        .await?;

    dialogue
        .update(State::PuzzleGame {
            index,
            options: engine.options().clone().into_inner(),
        })
        .await?;
    Ok(())
}

async fn show_incorrect_answers(
    bot: &Bot,
    dialogue: &QuizDialogue,
    store: &FileStore,
    index: usize,
) -> HandlerResult {
    let viewer = MistakeViewer::load(store).await;

    bot.send_message(dialogue.chat_id(), viewer.render())
        .reply_markup(KeyboardMarkup::new(vec![vec![KeyboardButton::new(BACK_TO_QUIZ)]]))
        .await?;

    dialogue.update(State::IncorrectAnswers { index }).await?;
    Ok(())
}

fn question_keyboard(options: &OptionSet) -> KeyboardMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = options
        .iter()
        .map(|option| vec![KeyboardButton::new(option.clone())])
        .collect();
    rows.push(vec![KeyboardButton::new(VIEW_INCORRECT_ANSWERS)]);
    KeyboardMarkup::new(rows)
}

enum Reply {
    Answer,
    Seek(usize),
    Unknown,
}

/// An offered option is always an answer, even one that looks like a number.
fn read_reply(text: &str, options: &OptionSet) -> Reply {
    if options.contains(text) {
        return Reply::Answer;
    }
    match parse_seek(text) {
        Some(target) => Reply::Seek(target),
        None => Reply::Unknown,
    }
}

/// `/seek 4` or a bare `4`. Stands in for the position slider.
fn parse_seek(text: &str) -> Option<usize> {
    let text = text.trim();
    let target = text.strip_prefix("/seek").unwrap_or(text).trim();
    target.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seek_commands() {
        assert_eq!(parse_seek("/seek 4"), Some(4));
        assert_eq!(parse_seek("  12 "), Some(12));
        assert_eq!(parse_seek("/seek"), None);
        assert_eq!(parse_seek("/seek -1"), None);
        assert_eq!(parse_seek("مرحبا"), None);
    }

    #[test]
    fn option_text_wins_over_seek() {
        let options = OptionSet::from(vec!["3".to_string(), "نعم".to_string(), "لا".to_string()]);

        assert!(matches!(read_reply("3", &options), Reply::Answer));
        assert!(matches!(read_reply("نعم", &options), Reply::Answer));
        assert!(matches!(read_reply("4", &options), Reply::Seek(4)));
        assert!(matches!(read_reply("/seek 3", &options), Reply::Seek(3)));
        assert!(matches!(read_reply("شكرا", &options), Reply::Unknown));
    }

    #[test]
    fn keyboard_lists_options_then_viewer_button() {
        let options = OptionSet::from(vec!["نعم".to_string(), "شكرا".to_string(), "مرحبا".to_string()]);
        let keyboard = question_keyboard(&options);

        let labels: Vec<&str> = keyboard
            .keyboard
            .iter()
            .map(|row| row[0].text.as_str())
            .collect();
        assert_eq!(labels, vec!["نعم", "شكرا", "مرحبا", VIEW_INCORRECT_ANSWERS]);
    }
}
