/// Iterator whose `next` borrows its context (usually the tree) only for the
/// duration of the call, so the context may be altered between steps.
pub trait ContextIterator<Context> {
    type Item;

    fn next(&mut self, context: &Context) -> Option<Self::Item>;

    /// Drains the remaining items into a vector.
    fn collect_remaining(&mut self, context: &Context) -> Vec<Self::Item> {
        let mut items = Vec::new();
        while let Some(item) = self.next(context) {
            items.push(item);
        }
        items
    }
}
