use super::SyntaxNode;

/// One step of a depth-first walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraversalEvent<N> {
    Enter(N),
    Leave(N),
}

pub trait SyntaxVisitor<N: SyntaxNode> {
    fn enter(&mut self, node: &N);
    fn leave(&mut self, node: &N);
}

/// Recording visitor, handy for replaying a walk later.
impl<N: SyntaxNode> SyntaxVisitor<N> for Vec<TraversalEvent<N>> {
    fn enter(&mut self, node: &N) {
        self.push(TraversalEvent::Enter(node.clone()));
    }

    fn leave(&mut self, node: &N) {
        self.push(TraversalEvent::Leave(node.clone()));
    }
}

/// Walk `root` depth-first, calling `enter` before a node's children and
/// `leave` after them. Iterative, so deep trees cannot overflow the stack.
pub fn traverse<N: SyntaxNode>(root: &N, visitor: &mut impl SyntaxVisitor<N>) {
    let mut pending = vec![TraversalEvent::Enter(root.clone())];

    while let Some(step) = pending.pop() {
        match step {
            TraversalEvent::Enter(node) => {
                visitor.enter(&node);
                let children = node.children();
                pending.push(TraversalEvent::Leave(node));
                pending.extend(children.into_iter().rev().map(TraversalEvent::Enter));
            }
            TraversalEvent::Leave(node) => visitor.leave(&node),
        }
    }
}
