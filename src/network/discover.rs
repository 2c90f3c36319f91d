use futures::stream::{self, Stream};
use std::vec;

use super::urls::*;
use super::Network;
use crate::error::{Error, Result};
use crate::network::lists::{ListDescriptor, ListLink};

/// Where discovery resumes on the next pull.
enum Stage {
    Ratings,
    Watchlist,
    Lists,
    Custom(vec::IntoIter<ListLink>),
}

impl Network {
    /// Every exportable list of the user: ratings, watchlist, then custom
    /// lists in page order.
    ///
    /// Pages are only fetched as the stream is polled, so discovery of later
    /// lists interleaves with whatever the consumer does with earlier ones.
    pub fn discover_lists<'a>(
        &'a self,
        user_id: &'a str,
    ) -> impl Stream<Item = Result<ListDescriptor>> + 'a {
        stream::try_unfold(Stage::Ratings, move |stage| self.next_list(user_id, stage))
    }

    async fn next_list(
        &self,
        user_id: &str,
        stage: Stage,
    ) -> Result<Option<(ListDescriptor, Stage)>> {
        match stage {
            // /lists has an old link for ratings; easier to hardcode it
            Stage::Ratings => {
                let path = RATINGS_PATH.replace("{user_id}", user_id);
                let ratings = ListDescriptor::new(path, "Ratings", user_id)?;
                Ok(Some((ratings, Stage::Watchlist)))
            }
            // /lists doesn't link the watchlist in an exportable form at all
            Stage::Watchlist => {
                let (url, html) = self
                    .get_page(&WATCHLIST_PATH.replace("{user_id}", user_id))
                    .await?;
                let list_id = self.markup.watchlist_id(&html).ok_or_else(|| Error::Parse {
                    url,
                    message: String::from("no pageId metadata on the watchlist page"),
                })?;
                let path = LIST_PATH.replace("{list_id}", &list_id);
                let watchlist = ListDescriptor::new(path, "Watchlist", user_id)?;
                Ok(Some((watchlist, Stage::Lists)))
            }
            Stage::Lists => {
                let (_, html) = self
                    .get_page(&LISTS_PATH.replace("{user_id}", user_id))
                    .await?;
                next_custom(self.markup.list_links(&html).into_iter())
            }
            Stage::Custom(links) => next_custom(links),
        }
    }
}

fn next_custom(mut links: vec::IntoIter<ListLink>) -> Result<Option<(ListDescriptor, Stage)>> {
    match links.next() {
        Some(link) => {
            let list = ListDescriptor::new(link.href.clone(), &link.title, &link.href)?;
            Ok(Some((list, Stage::Custom(links))))
        }
        None => Ok(None),
    }
}
