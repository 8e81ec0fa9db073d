//! Scripted `DogApi` fake shared by the store tests

use dogmatch_core::{DogApi, Error, Result, SearchQuery, SearchResult, types::Dog};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::oneshot;

/// One scripted answer of the fake
pub(crate) enum Reply<T> {
    Ok(T),
    Fail(&'static str),
    /// Answer with the value once the sender fires (or is dropped)
    After(oneshot::Receiver<()>, T),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Login(String, String),
    Logout,
    Breeds,
    Search(SearchQuery),
    Fetch(Vec<String>),
    Match(Vec<String>),
}

#[derive(Default)]
pub(crate) struct FakeApi {
    search_replies: Mutex<VecDeque<Reply<SearchResult>>>,
    fetch_replies: Mutex<VecDeque<Reply<Vec<Dog>>>>,
    match_replies: Mutex<VecDeque<Reply<Option<String>>>>,
    breeds: Mutex<Option<Vec<String>>>,
    pub(crate) login_fails: AtomicBool,
    pub(crate) logout_fails: AtomicBool,
    login_gate: Mutex<Option<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_search(&self, reply: Reply<SearchResult>) {
        self.search_replies.lock().unwrap().push_back(reply);
    }

    pub(crate) fn push_fetch(&self, reply: Reply<Vec<Dog>>) {
        self.fetch_replies.lock().unwrap().push_back(reply);
    }

    pub(crate) fn push_match(&self, reply: Reply<Option<String>>) {
        self.match_replies.lock().unwrap().push_back(reply);
    }

    pub(crate) fn set_breeds(&self, breeds: Option<Vec<&str>>) {
        *self.breeds.lock().unwrap() =
            breeds.map(|b| b.into_iter().map(str::to_string).collect());
    }

    /// Hold the next login until the sender fires (or is dropped)
    pub(crate) fn hold_login(&self, gate: oneshot::Receiver<()>) {
        *self.login_gate.lock().unwrap() = Some(gate);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn fetch_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Fetch(ids) => Some(ids),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn search_calls(&self) -> Vec<SearchQuery> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Search(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn resolve<T>(reply: Option<Reply<T>>, default: impl FnOnce() -> T) -> Result<T> {
    match reply {
        None => Ok(default()),
        Some(Reply::Ok(value)) => Ok(value),
        Some(Reply::Fail(message)) => Err(Error::Fetch(message.to_string())),
        Some(Reply::After(gate, value)) => {
            let _ = gate.await;
            Ok(value)
        }
    }
}

#[async_trait::async_trait]
impl DogApi for FakeApi {
    async fn login(&self, name: &str, email: &str) -> Result<()> {
        self.record(Call::Login(name.to_string(), email.to_string()));
        let gate = self.login_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.login_fails.load(Ordering::SeqCst) {
            Err(Error::Auth("Service error (401): Unauthorized".to_string()))
        } else {
            Ok(())
        }
    }

    async fn logout(&self) -> Result<()> {
        self.record(Call::Logout);
        if self.logout_fails.load(Ordering::SeqCst) {
            Err(Error::Auth("HTTP error: connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    async fn breeds(&self) -> Result<Vec<String>> {
        self.record(Call::Breeds);
        self.breeds
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Fetch("breeds unavailable".to_string()))
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        self.record(Call::Search(query.clone()));
        let reply = self.search_replies.lock().unwrap().pop_front();
        resolve(reply, SearchResult::default).await
    }

    async fn fetch_dogs(&self, ids: &[String]) -> Result<Vec<Dog>> {
        self.record(Call::Fetch(ids.to_vec()));
        let reply = self.fetch_replies.lock().unwrap().pop_front();
        resolve(reply, Vec::new).await
    }

    async fn match_dogs(&self, ids: &[String]) -> Result<Option<String>> {
        self.record(Call::Match(ids.to_vec()));
        let reply = self.match_replies.lock().unwrap().pop_front();
        resolve(reply, || None).await
    }
}

pub(crate) fn dog(id: &str) -> Dog {
    Dog {
        id: id.to_string(),
        img: format!("https://img.example/{}.jpg", id),
        name: format!("Dog {}", id),
        age: 2,
        zip_code: "60601".to_string(),
        breed: "Beagle".to_string(),
    }
}

pub(crate) fn result(ids: &[&str], total: u64) -> SearchResult {
    SearchResult {
        result_ids: ids.iter().map(|id| id.to_string()).collect(),
        total,
        ..Default::default()
    }
}
