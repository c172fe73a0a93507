/// A named family of incidents.
///
/// Implemented by the types generated with
/// [`define_incident!`](crate::define_incident). The name is the default name
/// of every incident built through the kind, and
/// [`Incident::is`](crate::Incident::is) compares against it.
pub trait IncidentKind {
    /// Name given to incidents of this kind.
    const NAME: &'static str;
}
