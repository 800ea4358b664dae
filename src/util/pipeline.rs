//! Execute pipelines.
//!
//! A pipeline is a chain of tasks connected by channels. Each task drains its
//! receiver before the next one starts, so elements keep their input order.

use std::sync::mpsc::channel;
pub use std::sync::mpsc::{Receiver, Sender};

/// A pipeline stage.
///
/// A task reads elements of type `I` and sends zero or more elements of type
/// `O` for each of them.
pub trait Task<I, O, E> {
    /// Process all elements from `rx` and send results to `tx`.
    fn process(self, rx: Receiver<I>, tx: Sender<O>) -> Result<(), E>;
}

impl<I, O, E, F> Task<I, O, E> for F
where
    F: FnOnce(Receiver<I>, Sender<O>) -> Result<(), E>,
{
    fn process(self, rx: Receiver<I>, tx: Sender<O>) -> Result<(), E> {
        (self)(rx, tx)
    }
}

/// A pipeline.
///
/// # Example
///
/// ```
/// use std::sync::mpsc::SendError;
///
/// use csspipe::util::pipeline::{Pipeline, Receiver, Sender};
///
/// let result: Vec<i32> = Pipeline::from_iter(["1", "two", "2", "NaN", "4"])
///     .pipe(
///         |rx: Receiver<&str>, tx: Sender<i32>| -> Result<(), SendError<i32>> {
///             for s in rx {
///                 if let Ok(t) = s.parse() {
///                     tx.send(t)?;
///                 }
///             }
///             Ok(())
///         },
///     )
///     .unwrap()
///     .into_iter()
///     .collect();
///
/// assert_eq!(vec![1, 2, 4], result);
/// ```
#[derive(Debug)]
pub struct Pipeline<T>(Receiver<T>);

impl<T> Pipeline<T> {
    /// Run a task that takes one receiver and one sender.
    pub fn pipe<U, E>(self, task: impl Task<T, U, E>) -> Result<Pipeline<U>, E> {
        let (tx, rx) = channel();
        task.process(self.0, tx)?;
        Ok(Pipeline(rx))
    }

    /// Call a fallible closure on each element of the pipeline.
    ///
    /// # Example
    ///
    /// ```
    /// use csspipe::util::pipeline::Pipeline;
    ///
    /// let result: Vec<i32> = Pipeline::from_iter([1, 2, 3])
    ///     .map_try(|x| Ok::<_, ()>(2 * x))
    ///     .unwrap()
    ///     .into_iter()
    ///     .collect();
    ///
    /// assert_eq!(vec![2, 4, 6], result);
    /// ```
    pub fn map_try<E, U>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<Pipeline<U>, E> {
        self.pipe(|rx: Receiver<T>, tx: Sender<U>| -> Result<(), E> {
            for t in rx {
                if tx.send((f)(t)?).is_err() {
                    break;
                }
            }
            Ok(())
        })
    }
}

impl<T> FromIterator<T> for Pipeline<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let (tx, rx) = channel();
        for t in iter {
            if tx.send(t).is_err() {
                break;
            }
        }
        Self(rx)
    }
}

impl<T> IntoIterator for Pipeline<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.0)
    }
}

/// An iterator over the elements of a [`Pipeline`].
#[derive(Debug)]
pub struct IntoIter<T>(Receiver<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.recv().ok()
    }
}
