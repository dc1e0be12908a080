use clap::{Args, Subcommand, ValueEnum};
use platter::{
    orders::OrderId,
    restaurants::RestaurantId,
    reviews::{Review, ReviewDraft, ReviewTarget},
};
use platter_app::context::AppContext;

use crate::output::{self, emit, or_dash};

#[derive(Debug, Args)]
pub(crate) struct ReviewsCommand {
    #[command(subcommand)]
    command: ReviewsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ReviewsSubcommand {
    /// Review a delivered order
    Submit(SubmitArgs),

    /// Reviews you have written
    Mine,

    /// Reviews of a restaurant
    Restaurant { id: RestaurantId },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
    Restaurant,
    Rider,
    Order,
}

impl From<TargetArg> for ReviewTarget {
    fn from(value: TargetArg) -> Self {
        match value {
            TargetArg::Restaurant => Self::Restaurant,
            TargetArg::Rider => Self::DeliveryPartner,
            TargetArg::Order => Self::Order,
        }
    }
}

#[derive(Debug, Args)]
struct SubmitArgs {
    /// Order being reviewed
    order: OrderId,

    /// Overall rating, 1 to 5
    #[arg(long)]
    rating: u8,

    #[arg(long, default_value = "")]
    comment: String,

    /// What the review is about
    #[arg(long, value_enum, default_value = "restaurant")]
    about: TargetArg,

    #[arg(long)]
    food: Option<u8>,

    #[arg(long)]
    delivery: Option<u8>,

    #[arg(long)]
    service: Option<u8>,

    /// Hide your name
    #[arg(long)]
    anonymous: bool,
}

impl From<SubmitArgs> for ReviewDraft {
    fn from(args: SubmitArgs) -> Self {
        Self {
            rating: args.rating,
            comment: args.comment,
            target: args.about.into(),
            food_rating: args.food,
            delivery_rating: args.delivery,
            service_rating: args.service,
            anonymous: args.anonymous,
            ..Self::for_order(args.order)
        }
    }
}

pub(crate) async fn run(command: ReviewsCommand, context: &AppContext) -> Result<(), String> {
    super::require_login(context)?;

    match command.command {
        ReviewsSubcommand::Submit(args) => {
            let order = context
                .orders_view()
                .detail(args.order)
                .await
                .map_err(|notice| super::fail(&notice))?;

            let draft = ReviewDraft::from(args);

            context
                .reviews_view()
                .submit(&order, &draft)
                .await
                .map_err(|error| super::fail(&error.notice()))?;

            emit(&format!("Thanks! Your review of order {} was posted.", order.order_number));

            Ok(())
        }
        ReviewsSubcommand::Mine => {
            let reviews = context
                .reviews_view()
                .mine()
                .await
                .map_err(|notice| super::fail(&notice))?;

            emit(&review_table(&reviews, "You have not written any reviews yet."));

            Ok(())
        }
        ReviewsSubcommand::Restaurant { id } => restaurant(id, context).await,
    }
}

pub(super) async fn restaurant(id: RestaurantId, context: &AppContext) -> Result<(), String> {
    let reviews = context
        .reviews_view()
        .for_restaurant(id)
        .await
        .map_err(|notice| super::fail(&notice))?;

    emit(&review_table(&reviews, "No reviews yet."));

    Ok(())
}

fn review_table(reviews: &[Review], empty: &str) -> String {
    if reviews.is_empty() {
        return empty.to_string();
    }

    output::table(
        &["Rating", "By", "Restaurant", "Comment"],
        reviews.iter().map(|review| {
            vec![
                review.stars(),
                review.author().to_string(),
                or_dash(review.restaurant_name.as_deref()),
                or_dash(review.comment.as_deref()),
            ]
        }),
        &[],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_become_a_draft_for_the_order() {
        let draft = ReviewDraft::from(SubmitArgs {
            order: OrderId::new(7),
            rating: 4,
            comment: "Hot and fresh".to_string(),
            about: TargetArg::Rider,
            food: None,
            delivery: Some(5),
            service: None,
            anonymous: true,
        });

        assert_eq!(draft.order_id, Some(OrderId::new(7)));
        assert_eq!(draft.target, ReviewTarget::DeliveryPartner);
        assert_eq!(draft.delivery_rating, Some(5));
        assert!(draft.anonymous);
    }
}
