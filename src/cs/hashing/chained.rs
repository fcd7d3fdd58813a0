//! # Separate Chaining String Table
//!
//! This module implements a **hash table** from string keys to `i32` values using
//! **separate chaining**. Each bucket owns a singly linked chain of heap entries.
//! It supports:
//! - **Insert**, **search** and **remove** with expected **O(1)** cost.
//! - **Load-factor driven resizing** in both directions: the bucket array doubles once
//!   `len / capacity` reaches the grow factor (default `2.0`) and halves after a removal
//!   leaves it at or below the shrink factor (default `0.5`), never dropping below
//!   [`MIN_CAPACITY`] buckets.
//! - **Fallible allocation**: the bucket array and key buffers are reserved up front, so an
//!   exhausted allocator surfaces as [`Error::Allocation`] and leaves the table untouched.
//!
//! Keys are hashed with the [polynomial key hash](super::polynomial) and mapped onto a bucket
//! by masking with `capacity - 1`, which is why the capacity is always a power of two.
//!
//! A resize re-links the existing entries into the new array; no entry is ever copied.
//! Each entry lands at the head of its new chain, so chain order after a resize is not
//! preserved.

use std::fmt;
use std::mem;

use log::{debug, trace, warn};

use super::polynomial::{bucket_index, hash_key};
use crate::error::{Error, Result};

/// Smallest bucket count a table ever has.
pub const MIN_CAPACITY: usize = 8;

/// Default load factor at which an insert doubles the bucket array.
pub const DEFAULT_GROW_LOAD_FACTOR: f64 = 2.0;

/// Default load factor at which a removal halves the bucket array.
pub const DEFAULT_SHRINK_LOAD_FACTOR: f64 = 0.5;

/// When `insert` checks the grow threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GrowTrigger {
    /// Check before the key lookup on every call, including value overwrites.
    #[default]
    EveryInsert,
    /// Check only when a new key is about to be added.
    NewKeyOnly,
}

type Link = Option<Box<Entry>>;

#[derive(Debug)]
struct Entry {
    key: Box<str>,
    value: i32,
    next: Link,
}

impl Entry {
    /// Allocates a detached entry holding its own copy of `key`.
    fn new(key: &str, value: i32) -> Result<Box<Self>> {
        let mut owned = String::new();
        owned.try_reserve_exact(key.len())?;
        owned.push_str(key);
        Ok(Box::new(Entry {
            key: owned.into_boxed_str(),
            value,
            next: None,
        }))
    }
}

/// One slot of the bucket array: the head of a chain.
#[derive(Debug, Default)]
struct Bucket {
    head: Link,
}

struct Chain<'a> {
    link: Option<&'a Entry>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        let entry = self.link?;
        self.link = entry.next.as_deref();
        Some(entry)
    }
}

impl Bucket {
    fn iter(&self) -> Chain<'_> {
        Chain {
            link: self.head.as_deref(),
        }
    }

    fn find(&self, key: &str) -> Option<&Entry> {
        self.iter().find(|entry| *entry.key == *key)
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Entry> {
        let mut link = self.head.as_deref_mut();
        while let Some(entry) = link {
            if *entry.key == *key {
                return Some(entry);
            }
            link = entry.next.as_deref_mut();
        }
        None
    }

    /// Appends at the tail of the chain.
    fn push_back(&mut self, entry: Box<Entry>) {
        let mut link = &mut self.head;
        while let Some(current) = link {
            link = &mut current.next;
        }
        *link = Some(entry);
    }

    fn push_front(&mut self, mut entry: Box<Entry>) {
        entry.next = self.head.take();
        self.head = Some(entry);
    }

    /// Detaches the entry for `key`, linking its predecessor (or the head) to its successor.
    fn unlink(&mut self, key: &str) -> Option<Box<Entry>> {
        let position = self.iter().position(|entry| *entry.key == *key)?;
        let mut link = &mut self.head;
        for _ in 0..position {
            link = &mut link.as_mut()?.next;
        }
        let mut entry = link.take()?;
        *link = entry.next.take();
        Some(entry)
    }
}

impl Drop for Bucket {
    // Release the chain front to back so long chains don't recurse through `Box` drops.
    fn drop(&mut self) {
        let mut link = self.head.take();
        while let Some(mut entry) = link {
            link = entry.next.take();
        }
    }
}

fn doubled_capacity(capacity: usize) -> Result<usize> {
    capacity
        .checked_mul(2)
        .ok_or(Error::CapacityOverflow(capacity))
}

fn allocate_buckets(capacity: usize) -> Result<Vec<Bucket>> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    buckets.resize_with(capacity, Bucket::default);
    Ok(buckets)
}

/// Separate-chaining table from `str` keys to `i32` values.
///
/// Dropping the table releases every entry and the bucket array.
#[derive(Debug)]
pub struct ChainedTable {
    buckets: Vec<Bucket>,
    /// Number of live entries across all chains.
    len: usize,
    /// Bucket count restored by `clear`.
    initial_capacity: usize,
    grow_load_factor: f64,
    shrink_load_factor: f64,
    grow_trigger: GrowTrigger,
}

/// A builder for the `ChainedTable`.
/// Typically you'll call `.with_capacity(...)`, `.with_grow_trigger(...)`, etc., then `.build()`.
#[derive(Debug, Clone)]
pub struct ChainedTableBuilder {
    capacity: usize,
    grow_load_factor: f64,
    shrink_load_factor: f64,
    grow_trigger: GrowTrigger,
}

impl Default for ChainedTableBuilder {
    fn default() -> Self {
        Self {
            capacity: MIN_CAPACITY,
            grow_load_factor: DEFAULT_GROW_LOAD_FACTOR,
            shrink_load_factor: DEFAULT_SHRINK_LOAD_FACTOR,
            grow_trigger: GrowTrigger::default(),
        }
    }
}

impl ChainedTableBuilder {
    /// Creates a builder with capacity 8, grow factor 2.0 and shrink factor 0.5.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the initial bucket count. It is rounded up to a power of two, and to at least
    /// [`MIN_CAPACITY`], when the table is built.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the load factor at which an insert grows the table.
    pub fn with_grow_load_factor(mut self, lf: f64) -> Self {
        self.grow_load_factor = lf;
        self
    }

    /// Sets the load factor at which a removal shrinks the table.
    /// Must stay below half the grow factor so a resize never undoes the previous one.
    pub fn with_shrink_load_factor(mut self, lf: f64) -> Self {
        self.shrink_load_factor = lf;
        self
    }

    /// Chooses whether overwrites of existing keys may trigger a grow.
    pub fn with_grow_trigger(mut self, trigger: GrowTrigger) -> Self {
        self.grow_trigger = trigger;
        self
    }

    /// Validates the parameters and allocates the bucket array.
    pub fn build(self) -> Result<ChainedTable> {
        let capacity = self
            .capacity
            .max(MIN_CAPACITY)
            .checked_next_power_of_two()
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "capacity {} has no power-of-two bucket count",
                    self.capacity
                ))
            })?;
        if !(self.grow_load_factor.is_finite() && self.grow_load_factor > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "grow load factor must be finite and > 0, got {}",
                self.grow_load_factor
            )));
        }
        if !(self.shrink_load_factor.is_finite()
            && self.shrink_load_factor >= 0.0
            && self.shrink_load_factor < self.grow_load_factor / 2.0)
        {
            return Err(Error::InvalidConfig(format!(
                "shrink load factor must be in [0, {}), got {}",
                self.grow_load_factor / 2.0,
                self.shrink_load_factor
            )));
        }

        Ok(ChainedTable {
            buckets: allocate_buckets(capacity)?,
            len: 0,
            initial_capacity: capacity,
            grow_load_factor: self.grow_load_factor,
            shrink_load_factor: self.shrink_load_factor,
            grow_trigger: self.grow_trigger,
        })
    }
}

impl ChainedTable {
    /// Creates an empty table with 8 buckets and the default resize policy.
    pub fn new() -> Result<Self> {
        ChainedTableBuilder::new().build()
    }

    /// Returns the number of key-value pairs in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets. Always a power of two, at least [`MIN_CAPACITY`].
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Number of entries chained in bucket `bucket`, or `None` past the end of the array.
    pub fn chain_len(&self, bucket: usize) -> Option<usize> {
        self.buckets.get(bucket).map(|b| b.iter().count())
    }

    /// Inserts `key` with `value`.
    ///
    /// A new key is appended at the tail of its chain; an existing key has its value
    /// overwritten in place and the previous value is returned. With
    /// [`GrowTrigger::EveryInsert`] the grow threshold is checked before the lookup, so an
    /// overwrite can still double the bucket array.
    ///
    /// Fails with [`Error::EmptyKey`] for `""` and with [`Error::Allocation`] if the grow or
    /// the new entry cannot be allocated.
    pub fn insert(&mut self, key: &str, value: i32) -> Result<Option<i32>> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        if self.grow_trigger == GrowTrigger::EveryInsert && self.should_grow() {
            self.grow()?;
        }

        let hash = hash_key(key);
        let mut index = bucket_index(hash, self.capacity());
        if let Some(entry) = self.buckets[index].find_mut(key) {
            let old = mem::replace(&mut entry.value, value);
            trace!("overwrote {:?} in bucket {}: {} -> {}", key, index, old, value);
            return Ok(Some(old));
        }

        if self.grow_trigger == GrowTrigger::NewKeyOnly && self.should_grow() {
            self.grow()?;
            index = bucket_index(hash, self.capacity());
        }
        let entry = Entry::new(key, value)?;
        self.buckets[index].push_back(entry);
        self.len += 1;
        trace!("inserted {:?} into bucket {}", key, index);
        Ok(None)
    }

    /// Returns the value stored for `key`, or [`Error::NotFound`].
    pub fn search(&self, key: &str) -> Result<i32> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        self.buckets[self.index_of(key)]
            .find(key)
            .map(|entry| entry.value)
            .ok_or(Error::NotFound)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.search(key).is_ok()
    }

    /// Removes `key` and returns its value, or fails with [`Error::NotFound`] without
    /// touching the table.
    ///
    /// A removal that leaves the load factor at or below the shrink factor halves the
    /// bucket array (down to [`MIN_CAPACITY`]). If that shrink cannot allocate, the removal
    /// still succeeds and the table keeps its current capacity.
    pub fn remove(&mut self, key: &str) -> Result<i32> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        let index = self.index_of(key);
        let entry = self.buckets[index].unlink(key).ok_or(Error::NotFound)?;
        self.len -= 1;
        trace!("removed {:?} from bucket {}", key, index);

        if self.should_shrink() {
            let target = self.capacity() / 2;
            if let Err(err) = self.resize(target) {
                warn!("shrink to {} buckets failed, keeping {}: {}", target, self.capacity(), err);
            }
        }
        Ok(entry.value)
    }

    /// Drops every entry and restores the initial bucket count.
    pub fn clear(&mut self) -> Result<()> {
        let buckets = allocate_buckets(self.initial_capacity)?;
        self.buckets = buckets;
        self.len = 0;
        debug!("cleared table, capacity reset to {}", self.initial_capacity);
        Ok(())
    }

    fn index_of(&self, key: &str) -> usize {
        bucket_index(hash_key(key), self.capacity())
    }

    fn should_grow(&self) -> bool {
        self.load_factor() >= self.grow_load_factor
    }

    fn should_shrink(&self) -> bool {
        self.capacity() > MIN_CAPACITY && self.load_factor() <= self.shrink_load_factor
    }

    fn grow(&mut self) -> Result<()> {
        let target = doubled_capacity(self.capacity())?;
        self.resize(target)
    }

    /// Moves every entry into a fresh array of `new_capacity` buckets.
    /// On allocation failure the table is left exactly as it was.
    fn resize(&mut self, new_capacity: usize) -> Result<()> {
        let fresh = allocate_buckets(new_capacity)?;
        let old = mem::replace(&mut self.buckets, fresh);
        debug!(
            "resizing table from {} to {} buckets ({} entries)",
            old.len(),
            new_capacity,
            self.len
        );

        for mut bucket in old {
            let mut link = bucket.head.take();
            while let Some(mut entry) = link {
                link = entry.next.take();
                let index = bucket_index(hash_key(&entry.key), new_capacity);
                self.buckets[index].push_front(entry);
            }
        }
        Ok(())
    }
}

impl fmt::Display for ChainedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hash Table")?;
        writeln!(f, "\tsize = {}", self.len)?;
        writeln!(f, "\tcapacity = {}", self.capacity())?;
        writeln!(f, "\tbuckets:")?;
        for (i, bucket) in self.buckets.iter().enumerate() {
            write!(f, "\t\tb. #{}: ", i)?;
            for entry in bucket.iter() {
                write!(f, "[{}:{}] -> ", entry.key, entry.value)?;
            }
            writeln!(f, "(null)")?;
        }
        Ok(())
    }
}
