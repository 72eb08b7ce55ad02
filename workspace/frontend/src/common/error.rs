use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

#[function_component(ErrorDisplay)]
pub fn error_display(props: &ErrorDisplayProps) -> Html {
    log::warn!("Displaying error to user: {}", props.message);

    html! {
        <section class="card bg-base-100 shadow">
            <div class="card-body gap-4">
                <div class="alert alert-error">
                    <i class="fas fa-exclamation-triangle text-2xl"></i>
                    <div class="flex flex-col gap-2">
                        <span class="font-semibold">{"Error Occurred"}</span>
                        <span class="text-sm">{&props.message}</span>
                    </div>
                </div>
                {if let Some(on_retry) = &props.on_retry {
                    let on_retry = on_retry.clone();
                    html! {
                        <button
                            class="btn btn-primary btn-sm self-start"
                            onclick={Callback::from(move |_| {
                                log::debug!("User clicked retry button");
                                on_retry.emit(());
                            })}
                        >
                            <i class="fas fa-redo"></i>
                            {" Try Again"}
                        </button>
                    }
                } else {
                    html! {}
                }}
            </div>
        </section>
    }
}
