//! # Cancellable Execution
//!
//! Prompts block on their input. [`Cancellable`] runs that blocking loop on a
//! background execution path and races it against a [`CancellationToken`]:
//!
//! ```text
//!   caller ──execute_with_cancellation──┐
//!                                       v
//!              +------------------ tokio::select! ------------------+
//!              |                                                    |
//!   spawn_blocking(prompt loop)                        token.cancelled()
//!              |                                                    |
//!   first to finish wins: loop result as is  /  PromptError::Cancelled
//! ```
//!
//! ## Abandoned reads
//!
//! Losing the race does **not** stop the background path. A read that is
//! already blocked stays blocked until its stream yields a line or closes,
//! and whatever it reads afterwards is consumed and discarded. The prompt's
//! input stays locked by that path in the meantime, so a later execution on
//! the same prompt waits for it. A clone given a new reader with
//! [`Prompt::with_reader`] does not wait.
//!
//! A Tokio runtime waits for its blocking tasks when it shuts down. A program
//! that cancels a prompt reading from stdin should therefore exit the
//! process explicitly instead of returning from `main`.
//!
//! A token that has already fired is reported as cancelled without starting
//! the background path at all.
//!
//! ## Example
//! ```rust,no_run
//! use std::time::Duration;
//! use promptline::{Cancellable, Prompt};
//!
//! #[tokio::main]
//! async fn main() {
//!     let name = Prompt::new("Enter Name");
//!
//!     match name.execute_with_timeout(Duration::from_secs(5)).await {
//!         Ok(Some(answer)) => println!("Hello {answer}!"),
//!         Ok(None) => println!("Hello stranger!"),
//!         Err(e) if e.is_cancelled() => {
//!             println!("Timed out!");
//!             std::process::exit(1);
//!         }
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    answer::Answer,
    error::{PromptError, Result},
    prompt::Prompt,
    sequence::{PromptSequence, Responses},
};

/// A blocking prompt operation that can be raced against cancellation.
///
/// Implemented for [`Prompt`] and [`PromptSequence`]. For a sequence the
/// whole remaining sequence is cancelled as one unit.
#[async_trait]
pub trait Cancellable: Clone + Send + Sync + 'static {
    type Output: Send + 'static;

    /// Runs the operation to completion on the current thread.
    fn run_blocking(&self) -> Result<Self::Output>;

    /// Runs the operation in the background and returns whichever comes
    /// first: its result, or [`PromptError::Cancelled`] once `token` fires.
    async fn execute_with_cancellation(&self, token: &CancellationToken) -> Result<Self::Output> {
        if token.is_cancelled() {
            debug!("cancellation fired before execution started");
            return Err(PromptError::Cancelled);
        }

        let target = self.clone();
        let handle = tokio::task::spawn_blocking(move || target.run_blocking());

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                // Dropping the handle detaches the blocking path.
                debug!("execution abandoned on cancellation");
                Err(PromptError::Cancelled)
            }
            joined = handle => match joined {
                Ok(result) => result,
                Err(err) => Err(PromptError::Background(err.to_string())),
            },
        }
    }

    /// Same as [`execute_with_cancellation`](Self::execute_with_cancellation)
    /// with a token that fires after `timeout`.
    async fn execute_with_timeout(&self, timeout: Duration) -> Result<Self::Output> {
        let token = cancel_after(timeout);
        let result = self.execute_with_cancellation(&token).await;
        // Also stops the timer task.
        token.cancel();
        result
    }
}

#[async_trait]
impl Cancellable for Prompt {
    type Output = Option<Answer>;

    fn run_blocking(&self) -> Result<Self::Output> {
        self.execute()
    }
}

#[async_trait]
impl Cancellable for PromptSequence {
    type Output = Responses;

    fn run_blocking(&self) -> Result<Self::Output> {
        self.execute()
    }
}

/// Returns a token that is cancelled once `duration` has elapsed.
///
/// Cancelling the token early stops the timer. Must be called from within a
/// Tokio runtime.
pub fn cancel_after(duration: Duration) -> CancellationToken {
    let token = CancellationToken::new();
    let timer = token.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(duration) => timer.cancel(),
            _ = timer.cancelled() => {}
        }
    });

    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SharedBuffer;
    use std::{
        io::{self, Cursor, Read},
        sync::mpsc,
    };

    /// Reader that blocks until a chunk arrives; EOF once the sender is gone.
    struct BlockingReader(mpsc::Receiver<Vec<u8>>);

    impl Read for BlockingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.recv() {
                Ok(chunk) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    Ok(n)
                }
                Err(_) => Ok(0),
            }
        }
    }

    fn blocking_prompt(key: &str) -> (Prompt, mpsc::Sender<Vec<u8>>, SharedBuffer) {
        let (tx, rx) = mpsc::channel();
        let output = SharedBuffer::new();
        let prompt = Prompt::new("Enter Name")
            .key(key)
            .with_reader(BlockingReader(rx))
            .with_writer(output.clone());
        (prompt, tx, output)
    }

    fn scripted(key: &str, input: &'static str) -> (Prompt, SharedBuffer) {
        let output = SharedBuffer::new();
        let prompt = Prompt::new("Enter Name")
            .key(key)
            .with_reader(Cursor::new(input))
            .with_writer(output.clone());
        (prompt, output)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_prompt_completes_before_cancellation() {
        let (prompt, _) = scripted("name", "Bobby\n");
        let token = CancellationToken::new();

        let answer = prompt.execute_with_cancellation(&token).await.unwrap();

        assert_eq!(answer, Some(Answer::from("Bobby")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_prompt_error_is_propagated_unchanged() {
        let (prompt, _) = scripted("name", "");

        let err = prompt
            .execute_with_timeout(Duration::from_secs(30))
            .await
            .unwrap_err();

        assert!(matches!(err, PromptError::InputExhausted));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fired_token_skips_execution() {
        let (prompt, output) = scripted("name", "Bobby\n");
        let token = CancellationToken::new();
        token.cancel();

        let err = prompt.execute_with_cancellation(&token).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(output.contents(), "");
        // the input was never touched
        assert_eq!(prompt.execute().unwrap(), Some(Answer::from("Bobby")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocked_read_is_cancelled_deterministically() {
        // Abandoned background reads keep running until their stream closes;
        // the senders are held here and dropped at the end to release them.
        let mut senders = Vec::new();

        for _ in 0..5 {
            let (prompt, tx, _) = blocking_prompt("name");
            senders.push(tx);

            let err = prompt
                .execute_with_cancellation(&cancel_after(Duration::from_millis(10)))
                .await
                .unwrap_err();

            assert!(err.is_cancelled());
        }

        drop(senders);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_abandoned_read_consumes_later_input() {
        let (prompt, tx, output) = blocking_prompt("name");

        let err = prompt
            .execute_with_timeout(Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(err.is_cancelled());

        // Wait until the detached path has rendered, i.e. owns the prompt I/O.
        tokio::time::timeout(Duration::from_secs(5), async {
            while output.contents().is_empty() {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();

        // The detached path is still reading and swallows this line.
        tx.send(b"Bobby\n".to_vec()).unwrap();
        drop(tx);

        // Once it finishes, the stream is spent for everyone else.
        let err = tokio::task::spawn_blocking(move || prompt.execute())
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, PromptError::InputExhausted));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_rewired_clone_is_not_held_by_abandoned_read() {
        let (prompt, tx, output) = blocking_prompt("name");

        let err = prompt
            .execute_with_timeout(Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(err.is_cancelled());

        tokio::time::timeout(Duration::from_secs(5), async {
            while output.contents().is_empty() {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();

        // The detached path still owns the old input; a fresh one is free.
        let retry = prompt.clone().with_reader(Cursor::new("Sarah\n"));
        let answer = retry
            .execute_with_timeout(Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(answer, Some(Answer::from("Sarah")));

        drop(tx);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_sequence_completes_within_timeout() {
        let (p1, _) = scripted("name1", "Bobby\n");
        let (p2, _) = scripted("name2", "Sarah\n");

        let responses = PromptSequence::new([p1, p2])
            .execute_with_timeout(Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(responses.get("name1"), Some(&Answer::from("Bobby")));
        assert_eq!(responses.get("name2"), Some(&Answer::from("Sarah")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_sequence_cancelled_on_blocked_member() {
        let (p1, _) = scripted("name1", "Bobby\n");
        let (p2, tx, _) = blocking_prompt("name2");
        let (p3, out3) = scripted("name3", "Alice\n");

        let err = PromptSequence::new([p1, p2, p3])
            .execute_with_timeout(Duration::from_millis(50))
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(out3.contents(), "");
        drop(tx);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_sequence_missing_key_through_wrapper() {
        let (p1, _) = scripted("name1", "Bobby\n");
        let (p2, _) = scripted("", "Sarah\n");

        let err = PromptSequence::new([p1, p2])
            .execute_with_cancellation(&CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PromptError::MissingKey { index: 1 }));
    }

    #[tokio::test]
    async fn test_cancel_after_fires() {
        let token = cancel_after(Duration::from_millis(5));
        tokio::time::timeout(Duration::from_secs(5), token.cancelled())
            .await
            .unwrap();
        assert!(token.is_cancelled());
    }
}
