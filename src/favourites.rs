use crate::model::{ActivityId, Dataset, EventId, Favourite, UserId};
use crate::storage::{transaction, Store};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::BTreeSet;

pub type FavouriteSet = BTreeSet<ActivityId>;

/// Cache des activités favorites par `(utilisateur, événement)`.
pub trait FavouriteCache: Send + Sync {
    fn get(&self, user: UserId, event: EventId) -> Option<FavouriteSet>;
    fn set(&self, user: UserId, event: EventId, favourites: FavouriteSet);
    fn clear(&self, user: UserId, event: EventId);
}

/// Cache borné, éviction du moins récemment utilisé.
#[derive(Debug)]
pub struct LruFavouriteCache {
    capacity: usize,
    entries: Mutex<IndexMap<(UserId, EventId), FavouriteSet>>,
}

impl LruFavouriteCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(IndexMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FavouriteCache for LruFavouriteCache {
    fn get(&self, user: UserId, event: EventId) -> Option<FavouriteSet> {
        let mut entries = self.entries.lock();
        let index = entries.get_index_of(&(user, event))?;
        let last = entries.len() - 1;
        entries.move_index(index, last);
        entries.get(&(user, event)).cloned()
    }

    fn set(&self, user: UserId, event: EventId, favourites: FavouriteSet) {
        let mut entries = self.entries.lock();
        entries.shift_remove(&(user, event));
        entries.insert((user, event), favourites);
        while entries.len() > self.capacity {
            entries.shift_remove_index(0);
        }
    }

    fn clear(&self, user: UserId, event: EventId) {
        self.entries.lock().shift_remove(&(user, event));
    }
}

/// Ne garde rien : chaque lecture repasse par le stockage.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFavouriteCache;

impl FavouriteCache for NoopFavouriteCache {
    fn get(&self, _user: UserId, _event: EventId) -> Option<FavouriteSet> {
        None
    }
    fn set(&self, _user: UserId, _event: EventId, _favourites: FavouriteSet) {}
    fn clear(&self, _user: UserId, _event: EventId) {}
}

pub fn favourites_for(
    dataset: &Dataset,
    cache: &dyn FavouriteCache,
    user: UserId,
    event: EventId,
) -> FavouriteSet {
    if let Some(hit) = cache.get(user, event) {
        return hit;
    }
    let favourites: FavouriteSet = dataset
        .favourites
        .iter()
        .filter(|f| f.user_id == user && f.event_id == event)
        .map(|f| f.activity_id)
        .collect();
    cache.set(user, event, favourites.clone());
    favourites
}

/// Ajoute ou retire un favori ; retourne `true` si l'activité est désormais favorite.
pub fn toggle_favourite<S: Store + ?Sized>(
    store: &S,
    cache: &dyn FavouriteCache,
    user: UserId,
    event: EventId,
    activity: ActivityId,
) -> anyhow::Result<bool> {
    let now_favourite = transaction::<_, _, anyhow::Error, _>(store, |d| {
        let before = d.favourites.len();
        d.favourites.retain(|f| {
            !(f.user_id == user && f.event_id == event && f.activity_id == activity)
        });
        if d.favourites.len() != before {
            return Ok(false);
        }
        d.favourites.push(Favourite {
            user_id: user,
            event_id: event,
            activity_id: activity,
        });
        Ok(true)
    })?;
    cache.clear(user, event);
    Ok(now_favourite)
}
